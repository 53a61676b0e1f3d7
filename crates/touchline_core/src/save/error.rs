use thiserror::Error;

use crate::error::MatchError;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Corrupted data: {0}")]
    Corrupted(String),

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Archive too large: {size} matches")]
    DataTooLarge { size: usize },

    #[error("Invalid match data: {0}")]
    Invalid(#[from] MatchError),
}

impl SaveError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            SaveError::Io(_) => true,
            SaveError::FileNotFound { .. } => true,
            SaveError::Corrupted(_) => false,
            SaveError::ChecksumMismatch => false,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(SaveError::FileNotFound { path: "x".into() }.is_recoverable());
        assert!(!SaveError::VersionMismatch { found: 9, expected: 1 }.is_recoverable());
        assert!(!SaveError::ChecksumMismatch.is_recoverable());
        assert!(!SaveError::Invalid(MatchError::MatchEnded).is_recoverable());
    }
}
