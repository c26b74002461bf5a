//! User configuration (`config.toml`).
//!
//! Looked up at `<config_dir>/todolist/config.toml` unless a path is given.
//! A missing file means defaults; a present but broken file is an error.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::fields::DatePolicy;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How due dates are read when checking for overdue tasks.
    pub date_policy: DatePolicy,

    /// Ask before deleting a task.
    pub confirm_delete: bool,

    /// Show done tasks in the TUI list.
    pub show_completed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            date_policy: DatePolicy::Lenient,
            confirm_delete: true,
            show_completed: true,
        }
    }
}

impl Config {
    /// Default location of the config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("todolist").join("config.toml"))
    }

    /// Load from `path`, or from [`default_path`](Self::default_path) when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
