//! # todolist
//!
//! A single-screen task list: tasks with a name, a `DD/MM/YYYY` due date and a
//! done flag, an editor that creates or updates tasks from two draft buffers,
//! and overdue detection against today's date.
//!
//! [`store::TaskStore`] holds all state and is the only place it changes.
//! Front ends read it through [`view::StoreView`]:
//!
//! - `todo` (or `todo ui`) opens the ratatui interface in [`tui`].
//! - `todo run [FILE]` applies line commands through [`cmd::Runner`].
//!
//! Tasks live in memory for the lifetime of the process.

pub mod cli;
pub mod cmd;
pub mod config;
pub mod confirm;
pub mod date;
pub mod error;
pub mod fields;
pub mod logging;
pub mod store;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}
