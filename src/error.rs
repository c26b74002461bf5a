//! Error types for the task list.
//!
//! `ValidationError` is the only failure the store itself can produce. The
//! remaining types belong to the front ends and the configuration layer.

use std::path::PathBuf;

use thiserror::Error;

/// Why a draft could not be saved.
///
/// Checks run in declaration order and the first failing one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task name required")]
    TextRequired,

    #[error("date required")]
    DateRequired,

    #[error("invalid date format")]
    InvalidDateFormat,
}

impl ValidationError {
    /// Short heading shown alongside the message in alerts and status bars.
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::TextRequired => "Error",
            ValidationError::DateRequired => "Date required",
            ValidationError::InvalidDateFormat => "Invalid date",
        }
    }

    /// `Title: message`, the form used by every front end.
    pub fn alert(&self) -> String {
        format!("{}: {}", self.title(), self)
    }
}

/// Failures while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failures of a single scripted command. None of these are fatal to a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try: text, date, add, save, edit, cancel, toggle, delete, list, show)")]
    UnknownCommand(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: String,
        expected: &'static str,
    },

    #[error("unterminated quote in: {0}")]
    UnterminatedQuote(String),

    #[error("no task at position {0}")]
    NoSuchPosition(usize),

    #[error("no task found matching '{0}'")]
    NotFound(String),

    #[error("{0}")]
    Ambiguous(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
