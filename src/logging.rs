//! Tracing setup for the binary.
//!
//! Logging stays off unless `TODOLIST_LOG` is set; its value is the filter
//! directive (for example `todolist=debug`).

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TODOLIST_LOG";

/// Install the global subscriber. Writes to `log_file` when given, stderr otherwise.
///
/// The TUI owns the terminal, so it should be given a file.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let Ok(directive) = std::env::var(LOG_ENV) else {
        return Ok(());
    };
    let filter = EnvFilter::try_new(&directive).with_context(|| format!("invalid {LOG_ENV} filter '{directive}'"))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
