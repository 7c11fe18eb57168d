//! Configuration for the `scout` binary.
//!
//! Values come from command-line flags, then an optional RON file, then
//! built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use scout_engine::MonitorSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_CONFIG_FILENAME: &str = "scout.ron";
pub const DEFAULT_AGENT_URL: &str = "http://localhost:8000";
const DEFAULT_APPROVER: &str = "scout";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// On-disk shape; every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub agent_url: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub max_attempts: Option<u32>,
    pub submit_timeout_secs: Option<u64>,
    pub approved_by: Option<String>,
    pub log_to_file: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub agent_url: String,
    pub monitor: MonitorSettings,
    pub approved_by: String,
    pub log_to_file: bool,
}

/// Loads `path`, or `./scout.ron` when no path is given and that file exists.
pub fn load_file_config(path: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILENAME), false),
    };

    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(FileConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path,
        message: err.to_string(),
    })
}

impl AppConfig {
    /// Merges the file with the flag override for the agent URL.
    pub fn resolve(file: FileConfig, agent_url: Option<String>) -> Result<Self, ConfigError> {
        let defaults = MonitorSettings::default();

        let poll_interval = match file.poll_interval_secs {
            Some(0) => {
                return Err(ConfigError::Invalid(
                    "poll_interval_secs must be at least 1".to_string(),
                ))
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.poll_interval,
        };
        let max_attempts = match file.max_attempts {
            Some(0) => {
                return Err(ConfigError::Invalid(
                    "max_attempts must be at least 1".to_string(),
                ))
            }
            Some(attempts) => attempts,
            None => defaults.max_attempts,
        };
        let submit_timeout = match file.submit_timeout_secs {
            Some(0) => {
                return Err(ConfigError::Invalid(
                    "submit_timeout_secs must be at least 1".to_string(),
                ))
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.submit_timeout,
        };

        let agent_url = agent_url
            .or(file.agent_url)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_AGENT_URL.to_string());

        Ok(Self {
            agent_url,
            monitor: MonitorSettings {
                poll_interval,
                max_attempts,
                submit_timeout,
            },
            approved_by: file
                .approved_by
                .unwrap_or_else(|| DEFAULT_APPROVER.to_string()),
            log_to_file: file.log_to_file.unwrap_or(false),
        })
    }
}
