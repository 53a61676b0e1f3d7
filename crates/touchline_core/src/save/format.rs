use std::collections::HashSet;

use chrono::{DateTime, Utc};
use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::SaveError;
use super::ARCHIVE_VERSION;
use crate::engine::Match;

/// Upper bound on matches kept in one archive.
pub const MAX_ARCHIVED_MATCHES: usize = 10_000;

const CHECKSUM_LEN: usize = 32;

/// Everything the match history persists.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MatchArchive {
    /// Layout version; only [`ARCHIVE_VERSION`] is readable
    pub version: u32,

    /// When the archive was written, supplied by the caller
    pub saved_at: DateTime<Utc>,

    /// Every kept match with its clock, roster and events
    pub matches: Vec<Match>,
}

impl MatchArchive {
    pub fn new(saved_at: DateTime<Utc>) -> Self {
        Self { version: ARCHIVE_VERSION, saved_at, matches: Vec::new() }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.matches.len() > MAX_ARCHIVED_MATCHES {
            return Err(SaveError::DataTooLarge { size: self.matches.len() });
        }

        let mut ids = HashSet::new();
        for m in &self.matches {
            if !ids.insert(m.id()) {
                return Err(SaveError::Corrupted(format!("match {} stored twice", m.id())));
            }
            m.validate()?;
        }

        let open = self.matches.iter().filter(|m| !m.is_ended()).count();
        if open > 1 {
            return Err(SaveError::Corrupted(format!("{} matches open at once", open)));
        }

        Ok(())
    }
}

/// Serialize and compress an archive
pub fn serialize_and_compress(archive: &MatchArchive) -> Result<Vec<u8>, SaveError> {
    archive.validate()?;

    // 1. MessagePack with field names
    let msgpack = to_vec_named(archive)?;

    // 2. LZ4, size prepended
    let compressed = compress_prepend_size(&msgpack);

    // 3. SHA256 trailer
    let checksum = Sha256::digest(&compressed);
    let mut result = compressed;
    result.extend_from_slice(&checksum);

    Ok(result)
}

/// Verify, decompress and deserialize an archive written with the current
/// layout version.
pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<MatchArchive, SaveError> {
    // size header + checksum
    if bytes.len() < 4 + CHECKSUM_LEN {
        return Err(SaveError::Corrupted(format!("{} bytes is too short", bytes.len())));
    }

    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    if Sha256::digest(payload)[..] != *checksum_bytes {
        return Err(SaveError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| SaveError::Decompression)?;
    let archive: MatchArchive = from_slice(&msgpack)?;

    if archive.version != ARCHIVE_VERSION {
        return Err(SaveError::VersionMismatch { found: archive.version, expected: ARCHIVE_VERSION });
    }

    Ok(archive)
}
