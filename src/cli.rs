use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Single-screen task list with due dates.
/// Starts the terminal interface unless a subcommand is given.
#[derive(Parser)]
#[command(name = "todo", version, about = "Task list with due dates and overdue tracking")]
pub struct Cli {
    /// Path to the config file (defaults to <config dir>/todolist/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Append log output here instead of stderr. Logging is enabled by TODOLIST_LOG.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Only treat exact DD/MM/YYYY calendar dates as readable when checking for overdue tasks.
    #[arg(long, global = true)]
    pub strict_dates: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
