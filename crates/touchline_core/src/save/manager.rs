use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::error::SaveError;
use super::format::{decompress_and_deserialize, serialize_and_compress, MatchArchive};
use crate::state::MatchHistory;

pub const ARCHIVE_FILE_NAME: &str = "matches.dat";

/// Reads and writes the match archive at one file path.
#[derive(Debug, Clone)]
pub struct SaveManager {
    path: PathBuf,
}

impl SaveManager {
    /// Archive stored as `matches.dat` inside `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { path: dir.as_ref().join(ARCHIVE_FILE_NAME) }
    }

    /// Archive stored at an explicit file path.
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, history: &MatchHistory, saved_at: DateTime<Utc>) -> Result<(), SaveError> {
        let archive = history.to_archive(saved_at);
        self.save_archive(&archive)?;
        info!("Saved {} matches to {}", archive.matches.len(), self.path.display());
        Ok(())
    }

    pub fn load(&self) -> Result<MatchHistory, SaveError> {
        let history = MatchHistory::from_archive(self.load_archive()?)?;
        info!("Loaded {} matches from {}", history.len(), self.path.display());
        Ok(history)
    }

    /// Loads the history, or an empty one when no archive exists yet.
    pub fn load_or_default(&self) -> Result<MatchHistory, SaveError> {
        match self.load() {
            Err(SaveError::FileNotFound { .. }) => Ok(MatchHistory::new()),
            other => other,
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn delete(&self) -> Result<(), SaveError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            info!("Deleted match archive {}", self.path.display());
        }
        Ok(())
    }

    pub fn save_archive(&self, archive: &MatchArchive) -> Result<(), SaveError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = serialize_and_compress(archive)?;

        // Atomic save: write to temp file, then rename
        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;

        debug!("Saved {} bytes to {:?}", data.len(), self.path);
        Ok(())
    }

    /// Reads and verifies the stored archive.
    pub fn load_archive(&self) -> Result<MatchArchive, SaveError> {
        if !self.path.exists() {
            return Err(SaveError::FileNotFound { path: self.path.display().to_string() });
        }

        let mut data = Vec::new();
        File::open(&self.path)?.read_to_end(&mut data)?;

        let archive = decompress_and_deserialize(&data)?;

        debug!("Loaded {} bytes from {:?}", data.len(), self.path);
        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{at, squad};
    use crate::models::SportType;
    use tempfile::TempDir;

    fn history_with_one_ended_match() -> MatchHistory {
        let players = squad(3);
        let mut history = MatchHistory::new();
        let id = history.create_match("Saved", &players, SportType::Soccer, at(0)).unwrap();
        let m = history.get_mut(id).unwrap();
        m.sub_in(players[0].id, at(1)).unwrap();
        m.start_play(at(10));
        m.add_goal(players[0].id, at(40)).unwrap();
        history.end_active(at(70));
        history
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SaveManager::new(temp_dir.path());
        let history = history_with_one_ended_match();

        manager.save(&history, at(100)).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded, history);
        let listing = &loaded.list()[0];
        assert_eq!(listing.goals_for, 1);
        assert_eq!(listing.final_elapsed_seconds, Some(60.0));
    }

    #[test]
    fn test_atomic_save() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SaveManager::with_file(temp_dir.path().join("nested").join("archive.dat"));

        manager.save(&MatchHistory::new(), at(0)).unwrap();

        assert!(manager.exists());
        assert!(manager.load().unwrap().is_empty());
        assert!(!manager.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_missing_archive() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SaveManager::new(temp_dir.path());

        assert!(!manager.exists());
        assert!(matches!(manager.load(), Err(SaveError::FileNotFound { .. })));
        assert!(manager.load_or_default().unwrap().is_empty());
        assert!(manager.delete().is_ok());
    }

    #[test]
    fn test_delete_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SaveManager::new(temp_dir.path());
        manager.save(&history_with_one_ended_match(), at(100)).unwrap();

        manager.delete().unwrap();
        assert!(!manager.exists());
    }

    #[test]
    fn test_corrupted_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SaveManager::new(temp_dir.path());
        fs::write(manager.path(), vec![7u8; 64]).unwrap();

        assert!(matches!(manager.load(), Err(SaveError::ChecksumMismatch)));
    }
}
