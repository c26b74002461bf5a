//! # todo
//!
//! Terminal task list with due dates.
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the interactive list
//! todo
//!
//! # Script a session
//! printf 'add "Buy milk" 01/01/2030\nlist\n' | todo run
//!
//! # Same, as JSON, reading exact dates only
//! todo --strict-dates run session.txt --format json
//! ```
//!
//! Settings are read from `<config dir>/todolist/config.toml`. Set
//! `TODOLIST_LOG=todolist=debug` to enable logging.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use todolist::cli::Cli;
use todolist::cmd::{cmd_completions, cmd_run, cmd_ui, Commands};
use todolist::config::Config;
use todolist::fields::DatePolicy;
use todolist::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    let mut config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    if cli.strict_dates {
        config.date_policy = DatePolicy::Strict;
    }
    info!(?config, "starting");

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => cmd_ui(&config)?,
        Commands::Run { input, yes, format } => {
            let failures = cmd_run(&config, input, yes, format)?;
            if failures > 0 {
                std::process::exit(1);
            }
        }
        Commands::Completions { shell } => cmd_completions(shell),
    }
    Ok(())
}
