//! Recovery record storage for append-only tailers.
//!
//! One JSON file per tailer, written with a write-to-temp-then-rename so a
//! crash mid-save never leaves a half-written record behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use reforger_types::TailState;

use crate::error::{ReaderError, Result};

/// Owns the recovery record of exactly one tailer
#[derive(Clone, Debug)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record for `expected_path`.
    ///
    /// Missing, empty, unreadable or corrupt records all mean "no prior
    /// state"; so does a record that belongs to a different file.
    pub fn load(&self, expected_path: &str) -> Option<TailState> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(
                    state = %self.path.display(),
                    error = %e,
                    "failed to read tail state, starting from the beginning"
                );
                return None;
            }
        };

        if content.trim().is_empty() {
            return None;
        }

        let state: TailState = match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    state = %self.path.display(),
                    error = %e,
                    "corrupt tail state, starting from the beginning"
                );
                return None;
            }
        };

        if !state.path.is_empty() && state.path != expected_path {
            tracing::warn!(
                state = %self.path.display(),
                recorded = %state.path,
                expected = %expected_path,
                "tail state belongs to another file, ignoring it"
            );
            return None;
        }

        Some(state)
    }

    /// Atomically replace the record on disk
    pub fn save(&self, state: &TailState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    ReaderError::Persistence(format!("failed to create state directory: {}", e))
                })?;
            }
        }

        let temp_path = self.path.with_extension("json.tmp");
        let file = File::create(&temp_path)
            .map_err(|e| ReaderError::Persistence(format!("failed to create temp file: {}", e)))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, state)?;
        writer
            .flush()
            .map_err(|e| ReaderError::Persistence(format!("failed to flush state: {}", e)))?;
        drop(writer);

        fs::rename(&temp_path, &self.path)
            .map_err(|e| ReaderError::Persistence(format!("failed to replace state: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("chat_state.json"));
        let state = TailState {
            path: "/logs/chatEvents.log".to_string(),
            last_offset: 128,
            carry_over: "[2025-05-27 05:5".to_string(),
        };

        store.save(&state).unwrap();
        assert_eq!(store.load("/logs/chatEvents.log"), Some(state));
    }

    #[test]
    fn test_missing_record_is_cold_start() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("none.json"));
        assert_eq!(store.load("/logs/x.log"), None);
    }

    #[test]
    fn test_corrupt_record_is_cold_start() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let store = StateStore::new(&path);
        assert_eq!(store.load("/logs/x.log"), None);
    }

    #[test]
    fn test_record_for_other_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        store.save(&TailState::new("/logs/a.log")).unwrap();

        assert_eq!(store.load("/logs/b.log"), None);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("nested/deeper/state.json"));
        store.save(&TailState::new("/logs/a.log")).unwrap();

        assert!(store.path().exists());
        assert!(!store.path().with_extension("json.tmp").exists());
    }
}
