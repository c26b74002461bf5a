//! Enumerations shared by the store, the configuration file and the CLI.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How due-date strings are turned into calendar dates.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DatePolicy {
    /// Positional day/month/year with calendar rollover ("32/01/2025" is 1 Feb 2025).
    #[default]
    Lenient,
    /// Only real calendar dates in DD/MM/YYYY form; anything else has no date.
    Strict,
}

/// Whether a save creates a new task or updates the one being edited.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EditorMode {
    Create,
    Edit,
}

/// Output format for the `run` command's `list` and `show`.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
