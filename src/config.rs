//! Terminal configuration
//!
//! Loaded from `link26.json` in the working directory, or from the file named
//! by `LINK26_CONFIG`. Missing fields fall back to their defaults; a missing
//! or unreadable file falls back to the built-in configuration.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_ENV_VAR: &str = "LINK26_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "link26.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub save_path: PathBuf,
    pub save_enabled: bool,       // false swaps in the no-op save provider
    pub decay_interval_ms: u64,
    pub history_limit: usize,
    pub transcript_limit: usize,
    pub log_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from("link26_save.json"),
            save_enabled: true,
            decay_interval_ms: 3000,
            history_limit: 60,
            transcript_limit: 500,
            log_path: PathBuf::from("link26.log"),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = GameConfig::from_json_str(&contents)?;
        Ok(config)
    }

    pub fn decay_interval(&self) -> Duration {
        Duration::from_millis(self.decay_interval_ms.max(1))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where the active configuration came from
#[derive(Debug)]
pub enum ConfigSource {
    Builtin,
    File(PathBuf),
    /// The file exists but could not be used; defaults are active
    Fallback { path: PathBuf, error: ConfigError },
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::File(path) => Some(path),
            _ => None,
        }
    }

    /// Log how the configuration was resolved. Call once a subscriber is installed.
    pub fn report(&self) {
        match self {
            ConfigSource::Builtin => tracing::info!(target: "link26::config", "config.loaded=builtin"),
            ConfigSource::File(path) => tracing::info!(
                target: "link26::config",
                path = %path.display(),
                "config.loaded=file"
            ),
            ConfigSource::Fallback { path, error } => tracing::warn!(
                target: "link26::config",
                path = %path.display(),
                error = %error,
                "config.load_failed"
            ),
        }
    }
}

/// Load the configuration named by `LINK26_CONFIG`, else `link26.json`, else defaults.
pub fn load_config_from_env() -> (GameConfig, ConfigSource) {
    let override_path = env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from);
    load_config(override_path)
}

pub fn load_config(override_path: Option<PathBuf>) -> (GameConfig, ConfigSource) {
    let path = match override_path {
        Some(path) => path,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default_path.exists() {
                return (GameConfig::default(), ConfigSource::Builtin);
            }
            default_path
        }
    };

    match GameConfig::from_file(&path) {
        Ok(config) => (config, ConfigSource::File(path)),
        Err(error) => (GameConfig::default(), ConfigSource::Fallback { path, error }),
    }
}
