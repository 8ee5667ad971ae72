//! Process configuration resolved from the environment.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Fallbacks live under the OS temp directory.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "DOS_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "DOS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "DOS_LOG_DIR";

pub const DEFAULT_DB_FILE_NAME: &str = "dos.sqlite3";
pub const DEFAULT_LOG_DIR_NAME: &str = "dos-logs";

/// On-device storage key of the wizard aggregate.
pub const PROJECT_DATA_KEY: &str = "dos-project-data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel { value: String, reason: String },
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel { value, reason } => {
                write!(f, "invalid {ENV_LOG_LEVEL} `{value}`: {reason}")
            }
            Self::RelativeLogDir(path) => write!(
                f,
                "{ENV_LOG_DIR} must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: PathBuf,
}

impl CoreConfig {
    /// Reads `DOS_DB_PATH`, `DOS_LOG_LEVEL` and `DOS_LOG_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CoreConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let log_level = match read(ENV_LOG_LEVEL) {
            Some(value) => normalize_level(&value)
                .map_err(|reason| ConfigError::InvalidLogLevel { value, reason })?,
            None => default_log_level(),
        };

        let log_dir = match read(ENV_LOG_DIR) {
            Some(value) => {
                let path = PathBuf::from(value);
                if !path.is_absolute() {
                    return Err(ConfigError::RelativeLogDir(path));
                }
                path
            }
            None => std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}
