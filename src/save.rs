//! Snapshot persistence
//!
//! The console only sees [`SaveProvider`]. [`JsonFileSave`] keeps one named
//! record on disk; [`DisabledSave`] stands in when saving is switched off.

use crate::game::GameState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const DEFAULT_SAVE_KEY: &str = "default";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("save file could not be encoded: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("save file corrupted: {0}")]
    Corrupted(String),
}

/// Where game snapshots live between sessions
pub trait SaveProvider {
    /// `Ok(None)` when there is nothing usable to restore
    fn load(&self) -> Result<Option<GameState>, SaveError>;
    fn save(&self, state: &GameState) -> Result<(), SaveError>;
    fn clear(&self) -> Result<(), SaveError>;

    fn name(&self) -> &'static str;
}

/// On-disk record: one keyed snapshot plus when it was written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRecord {
    pub key: String,
    pub state: GameState,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct JsonFileSave {
    path: PathBuf,
    key: String,
}

impl JsonFileSave {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: DEFAULT_SAVE_KEY.to_string(),
        }
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Read the record without the lenient fallbacks `load` applies
    pub fn read_record(&self) -> Result<SaveRecord, SaveError> {
        let contents = fs::read_to_string(&self.path)?;
        let record: SaveRecord = serde_json::from_str(&contents)?;
        if record.key != self.key {
            return Err(SaveError::Corrupted(format!(
                "expected key {:?}, found {:?}",
                self.key, record.key
            )));
        }
        Ok(record)
    }
}

impl SaveProvider for JsonFileSave {
    fn load(&self) -> Result<Option<GameState>, SaveError> {
        match self.read_record() {
            Ok(record) => Ok(Some(record.state)),
            Err(SaveError::Io(err)) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(SaveError::Io(err)) => Err(SaveError::Io(err)),
            Err(err) => {
                tracing::warn!(
                    target: "link26::save",
                    path = %self.path.display(),
                    error = %err,
                    "save.discarded"
                );
                Ok(None)
            }
        }
    }

    fn save(&self, state: &GameState) -> Result<(), SaveError> {
        let record = SaveRecord {
            key: self.key.clone(),
            state: state.clone(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&record)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(target: "link26::save", path = %self.path.display(), "save.written");
        Ok(())
    }

    fn clear(&self) -> Result<(), SaveError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn name(&self) -> &'static str {
        "json-file"
    }
}

/// Remote saves are not available yet; every call is a logged no-op
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSave;

impl SaveProvider for DisabledSave {
    fn load(&self) -> Result<Option<GameState>, SaveError> {
        tracing::info!(target: "link26::save", "Cloud save is coming soon.");
        Ok(None)
    }

    fn save(&self, _state: &GameState) -> Result<(), SaveError> {
        tracing::info!(target: "link26::save", "Cloud save is coming soon.");
        Ok(())
    }

    fn clear(&self) -> Result<(), SaveError> {
        tracing::info!(target: "link26::save", "Cloud save is coming soon.");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(dir: &tempfile::TempDir) -> JsonFileSave {
        JsonFileSave::new(dir.path().join("save.json"))
    }

    #[test]
    fn missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(provider(&dir).load().unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let save = provider(&dir);
        let mut state = GameState::new(Utc::now());
        state.cash = 1;
        state.session.scanned_hosts.insert("orbital");
        save.save(&state).unwrap();

        assert!(!save.tmp_path().exists());
        assert_eq!(save.load().unwrap(), Some(state));
    }

    #[test]
    fn scanned_hosts_are_written_as_a_list() {
        let dir = tempfile::tempdir().unwrap();
        let save = provider(&dir);
        let mut state = GameState::new(Utc::now());
        state.session.scanned_hosts.insert("iris");
        save.save(&state).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(save.path()).unwrap()).unwrap();
        assert_eq!(raw["key"], "default");
        assert_eq!(raw["state"]["session"]["scanned_hosts"], serde_json::json!(["iris"]));
    }

    #[test]
    fn corrupt_file_is_treated_as_no_save() {
        let dir = tempfile::tempdir().unwrap();
        let save = provider(&dir);
        fs::write(save.path(), "{ truncated").unwrap();
        assert!(save.load().unwrap().is_none());
        assert!(matches!(save.read_record(), Err(SaveError::Serde(_))));
    }

    #[test]
    fn foreign_key_is_corrupted() {
        let dir = tempfile::tempdir().unwrap();
        let save = provider(&dir);
        save.save(&GameState::new(Utc::now())).unwrap();
        let other = provider(&dir).with_key("slot-2");
        assert!(matches!(other.read_record(), Err(SaveError::Corrupted(_))));
        assert!(other.load().unwrap().is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let save = provider(&dir);
        save.save(&GameState::new(Utc::now())).unwrap();
        save.clear().unwrap();
        save.clear().unwrap();
        assert!(save.load().unwrap().is_none());
    }

    #[test]
    fn disabled_provider_is_inert() {
        let save = DisabledSave;
        save.save(&GameState::new(Utc::now())).unwrap();
        assert!(save.load().unwrap().is_none());
        save.clear().unwrap();
    }
}
