//! Command implementations for the CLI interface.
//!
//! `run` drives one in-memory store from a stream of line commands, so a whole
//! session (add, edit, toggle, delete, list) can be scripted or typed at a
//! prompt. `ui` hands the store to the terminal interface.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use clap_complete::{generate, Shell};
use tracing::{debug, warn};

use crate::config::Config;
use crate::confirm::{AlwaysConfirm, PromptConfirm};
use crate::error::CommandError;
use crate::fields::OutputFormat;
use crate::store::TaskStore;
use crate::task::TaskId;
use crate::tui::run::run_tui;
use crate::view::{render_rows, render_table, StoreView};

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive terminal interface (default).
    Ui,

    /// Apply line commands from a file or stdin to a fresh task list.
    ///
    /// Commands: text <s>, date <s>, add <text> [date], save, edit <ref>,
    /// cancel, toggle <ref>, delete <ref>, list, show. A <ref> is a list
    /// position, an id prefix, or the exact task text.
    Run {
        /// Script to read; `-` or omitted reads stdin.
        input: Option<PathBuf>,
        /// Delete without asking.
        #[arg(long, short)]
        yes: bool,
        /// Output format for `list` and `show`.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Text(String),
    Date(String),
    Add { text: String, date: Option<String> },
    Save,
    Edit(String),
    Cancel,
    Toggle(String),
    Delete(String),
    List,
    Show,
}

/// Split a line into words; double quotes group words, `""` inside quotes is a literal quote.
fn split_words(line: &str) -> Result<Vec<String>, CommandError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                    quoted = true;
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    words.push(std::mem::take(&mut current));
                    quoted = false;
                }
            }
            _ => current.push(ch),
        }
    }
    if in_quotes {
        return Err(CommandError::UnterminatedQuote(line.to_string()));
    }
    if !current.is_empty() || quoted {
        words.push(current);
    }
    Ok(words)
}

/// A quoted empty word counts, so `add Milk ""` still reaches the date check.
fn looks_like_date(word: &str) -> bool {
    word.is_empty() || word.contains('/')
}

/// Parse a script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ScriptCommand>, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let words = split_words(trimmed)?;
    let Some((name, args)) = words.split_first() else {
        return Ok(None);
    };
    let name = name.to_lowercase();
    let rest = args.join(" ");

    let reference = |expected: &'static str| -> Result<String, CommandError> {
        if rest.is_empty() {
            Err(CommandError::MissingArgument {
                command: name.clone(),
                expected,
            })
        } else {
            Ok(rest.clone())
        }
    };

    let cmd = match name.as_str() {
        "text" => ScriptCommand::Text(rest.clone()),
        "date" => ScriptCommand::Date(rest.clone()),
        "add" => match args {
            [] => {
                return Err(CommandError::MissingArgument {
                    command: name.clone(),
                    expected: "a task name and optional date",
                })
            }
            // The last word is the date only if it looks like one.
            [words @ .., date] if !words.is_empty() && looks_like_date(date) => ScriptCommand::Add {
                text: words.join(" "),
                date: Some(date.clone()),
            },
            words => ScriptCommand::Add {
                text: words.join(" "),
                date: None,
            },
        },
        "save" => ScriptCommand::Save,
        "edit" => ScriptCommand::Edit(reference("a task reference")?),
        "cancel" => ScriptCommand::Cancel,
        "toggle" | "done" => ScriptCommand::Toggle(reference("a task reference")?),
        "delete" | "rm" => ScriptCommand::Delete(reference("a task reference")?),
        "list" | "ls" => ScriptCommand::List,
        "show" => ScriptCommand::Show,
        _ => return Err(CommandError::UnknownCommand(name)),
    };
    Ok(Some(cmd))
}

/// Resolve a task reference: 1-based position, id prefix (4+ chars), or exact text.
///
/// Text matches are case-insensitive; more than one match is an error listing
/// the candidates.
pub fn resolve_task(reference: &str, store: &TaskStore) -> Result<TaskId, CommandError> {
    let reference = reference.trim();
    if let Ok(pos) = reference.parse::<usize>() {
        return pos
            .checked_sub(1)
            .and_then(|i| store.tasks().get(i))
            .map(|t| t.id)
            .ok_or(CommandError::NoSuchPosition(pos));
    }

    let lower = reference.to_lowercase();
    if lower.len() >= 4 {
        let by_id: Vec<TaskId> = store
            .tasks()
            .iter()
            .filter(|t| t.id.to_string().starts_with(&lower))
            .map(|t| t.id)
            .collect();
        match by_id.as_slice() {
            [id] => return Ok(*id),
            [] => {}
            _ => return Err(CommandError::Ambiguous(format!("Id prefix '{}' matches {} tasks", reference, by_id.len()))),
        }
    }

    let matches: Vec<(usize, TaskId, &str)> = store
        .tasks()
        .iter()
        .enumerate()
        .filter(|(_, t)| t.text.to_lowercase() == lower)
        .map(|(i, t)| (i + 1, t.id, t.text.as_str()))
        .collect();

    match matches.as_slice() {
        [] => Err(CommandError::NotFound(reference.to_string())),
        [(_, id, _)] => Ok(*id),
        _ => {
            let mut msg = format!("Multiple tasks found with text '{}':\n", reference);
            for (pos, id, text) in &matches {
                msg.push_str(&format!("  #{} {}: {}\n", pos, id.short(), text));
            }
            msg.push_str("Please use the position or id instead.");
            Err(CommandError::Ambiguous(msg))
        }
    }
}

/// Where delete confirmations come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmMode {
    /// Never ask.
    Always,
    /// Read the answer from the next line of the command stream.
    Inline,
    /// Ask on the controlling terminal (stdin/stderr).
    Terminal,
}

/// Applies script commands to a store, writing results to `out` and problems to `err`.
pub struct Runner<R, W, E> {
    store: TaskStore,
    input: R,
    out: W,
    err: E,
    format: OutputFormat,
    confirm: ConfirmMode,
}

impl<R: BufRead, W: Write, E: Write> Runner<R, W, E> {
    pub fn new(store: TaskStore, input: R, out: W, err: E) -> Self {
        Self {
            store,
            input,
            out,
            err,
            format: OutputFormat::Table,
            confirm: ConfirmMode::Inline,
        }
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn confirm(mut self, confirm: ConfirmMode) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn into_store(self) -> TaskStore {
        self.store
    }

    /// Process every line until EOF. Returns how many commands failed.
    pub fn run(&mut self) -> io::Result<usize> {
        let mut failures = 0;
        let mut line_no = 0usize;
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            line_no += 1;
            let result = parse_line(&line).and_then(|cmd| match cmd {
                Some(cmd) => self.execute(cmd),
                None => Ok(()),
            });
            if let Err(e) = result {
                failures += 1;
                debug!(line = line_no, error = %e, "command failed");
                match e {
                    CommandError::Validation(v) => writeln!(self.err, "{}", v.alert())?,
                    other => writeln!(self.err, "line {}: {}", line_no, other)?,
                }
            }
        }
        self.out.flush()?;
        Ok(failures)
    }

    /// Apply one command.
    pub fn execute(&mut self, cmd: ScriptCommand) -> Result<(), CommandError> {
        match cmd {
            ScriptCommand::Text(s) => self.store.set_draft_text(s),
            ScriptCommand::Date(s) => self.store.set_draft_date(s),
            ScriptCommand::Add { text, date } => {
                self.store.set_draft_text(text);
                self.store.set_draft_date(date.unwrap_or_default());
                self.save()?;
            }
            ScriptCommand::Save => self.save()?,
            ScriptCommand::Edit(r) => {
                let id = resolve_task(&r, &self.store)?;
                self.store.begin_edit_id(id);
                self.say(format!("Editing task {}", id.short()));
            }
            ScriptCommand::Cancel => self.store.cancel_edit(),
            ScriptCommand::Toggle(r) => {
                let id = resolve_task(&r, &self.store)?;
                self.store.toggle_done(id);
                let done = self.store.get(id).is_some_and(|t| t.done);
                self.say(format!(
                    "Task {} {}",
                    id.short(),
                    if done { "marked done" } else { "reopened" }
                ));
            }
            ScriptCommand::Delete(r) => {
                let id = resolve_task(&r, &self.store)?;
                let deleted = match self.confirm {
                    ConfirmMode::Always => self.store.request_delete(id, &mut AlwaysConfirm),
                    ConfirmMode::Inline => {
                        let mut prompt = PromptConfirm::new(&mut self.input, &mut self.err);
                        self.store.request_delete(id, &mut prompt)
                    }
                    ConfirmMode::Terminal => self.store.request_delete(id, &mut PromptConfirm::terminal()),
                };
                self.say(if deleted { "Deleted.".to_string() } else { "Kept.".to_string() });
            }
            ScriptCommand::List => {
                let view = StoreView::of(&self.store);
                let text = match self.format {
                    OutputFormat::Table => render_rows(&view),
                    OutputFormat::Json => json_line(&view.rows),
                };
                self.emit(&text);
            }
            ScriptCommand::Show => {
                let view = StoreView::of(&self.store);
                let text = match self.format {
                    OutputFormat::Table => render_table(&view),
                    OutputFormat::Json => json_line(&view),
                };
                self.emit(&text);
            }
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), CommandError> {
        let saved = self.store.save()?;
        let verb = if saved.created { "Added" } else { "Updated" };
        self.say(format!("{} task {}", verb, saved.id.short()));
        Ok(())
    }

    fn say(&mut self, line: String) {
        self.emit(&format!("{line}\n"));
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            warn!(error = %e, "failed to write output");
        }
    }
}

fn json_line<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(s) => format!("{s}\n"),
        Err(e) => format!("{{\"error\":\"{e}\"}}\n"),
    }
}

/// Run a script from a file or stdin against a fresh store.
///
/// Returns the number of failed commands.
pub fn cmd_run(config: &Config, input: Option<PathBuf>, yes: bool, format: OutputFormat) -> Result<usize> {
    let store = TaskStore::with_date_policy(config.date_policy);
    let ask = config.confirm_delete && !yes;
    let stdout = io::stdout();
    let stderr = io::stderr();

    let failures = match input.filter(|p| p.as_os_str() != "-") {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("failed to open script {}", path.display()))?;
            let confirm = if ask { ConfirmMode::Terminal } else { ConfirmMode::Always };
            Runner::new(store, BufReader::new(file), stdout.lock(), stderr.lock())
                .format(format)
                .confirm(confirm)
                .run()?
        }
        None => {
            let confirm = if ask { ConfirmMode::Inline } else { ConfirmMode::Always };
            Runner::new(store, io::stdin().lock(), stdout.lock(), stderr.lock())
                .format(format)
                .confirm(confirm)
                .run()?
        }
    };
    Ok(failures)
}

/// Launch the terminal user interface.
pub fn cmd_ui(config: &Config) -> Result<()> {
    run_tui(config).context("UI error")
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn run_script(script: &str) -> (TaskStore, String, String, usize) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut runner = Runner::new(TaskStore::new(), script.as_bytes(), &mut out, &mut err);
        let failures = runner.run().unwrap();
        let store = runner.into_store();
        (
            store,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
            failures,
        )
    }

    #[test]
    fn test_split_words_handles_quotes() {
        assert_eq!(split_words(r#"add "Buy milk" 01/01/2030"#).unwrap(), ["add", "Buy milk", "01/01/2030"]);
        assert_eq!(split_words(r#"text "say ""hi""""#).unwrap(), ["text", r#"say "hi""#]);
        assert_eq!(split_words(r#"date """#).unwrap(), ["date", ""]);
        assert!(split_words(r#"add "open"#).is_err());
    }

    #[test]
    fn test_parse_line_commands() {
        assert_eq!(parse_line("  # comment").unwrap(), None);
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("text Buy milk").unwrap(), Some(ScriptCommand::Text("Buy milk".into())));
        assert_eq!(parse_line("SAVE").unwrap(), Some(ScriptCommand::Save));
        assert_eq!(
            parse_line("add Buy fresh milk 01/01/2030").unwrap(),
            Some(ScriptCommand::Add {
                text: "Buy fresh milk".into(),
                date: Some("01/01/2030".into())
            })
        );
        assert_eq!(
            parse_line("add Milk").unwrap(),
            Some(ScriptCommand::Add {
                text: "Milk".into(),
                date: None
            })
        );
        assert_eq!(
            parse_line("add Buy milk").unwrap(),
            Some(ScriptCommand::Add {
                text: "Buy milk".into(),
                date: None
            })
        );
        assert_eq!(
            parse_line(r#"add "Buy milk" 1/1/2030"#).unwrap(),
            Some(ScriptCommand::Add {
                text: "Buy milk".into(),
                date: Some("1/1/2030".into())
            })
        );
        assert!(matches!(parse_line("edit"), Err(CommandError::MissingArgument { .. })));
        assert!(matches!(parse_line("frobnicate 1"), Err(CommandError::UnknownCommand(_))));
    }

    #[test]
    fn test_resolve_by_position_text_and_id() {
        let (store, _, _, _) = run_script("add Alpha 01/01/2030\nadd Beta 01/01/2030\n");
        let beta = store.tasks()[1].id;

        assert_eq!(resolve_task("2", &store).unwrap(), beta);
        assert_eq!(resolve_task("beta", &store).unwrap(), beta);
        assert_eq!(resolve_task(&beta.to_string()[..8], &store).unwrap(), beta);
        assert_eq!(resolve_task("0", &store), Err(CommandError::NoSuchPosition(0)));
        assert_eq!(resolve_task("3", &store), Err(CommandError::NoSuchPosition(3)));
        assert!(matches!(resolve_task("gamma", &store), Err(CommandError::NotFound(_))));
    }

    #[test]
    fn test_resolve_ambiguous_text_lists_candidates() {
        let (store, _, _, _) = run_script("add Same 01/01/2030\nadd same 02/01/2030\n");
        let Err(CommandError::Ambiguous(msg)) = resolve_task("SAME", &store) else {
            panic!("expected ambiguity");
        };
        assert!(msg.contains("#1"));
        assert!(msg.contains("#2"));
    }

    #[test]
    fn test_validation_errors_are_reported_and_run_continues() {
        let script = "text\nsave\ntext X\ndate 1/1/2030\nsave\ndate 01/01/2030\nsave\n";
        let (store, out, err, failures) = run_script(script);
        assert_eq!(failures, 2);
        assert_eq!(
            err,
            format!(
                "{}\n{}\n",
                ValidationError::TextRequired.alert(),
                ValidationError::InvalidDateFormat.alert()
            )
        );
        assert!(out.starts_with("Added task "));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_without_date_is_rejected() {
        let (store, _, err, failures) = run_script("add Milk\n");
        assert_eq!(failures, 1);
        assert!(err.contains("date required"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_multi_word_text_without_date_reports_missing_date() {
        let (store, _, err, failures) = run_script("add Buy oat milk\n");
        assert_eq!(failures, 1);
        assert_eq!(err, format!("{}\n", ValidationError::DateRequired.alert()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_edit_then_save_updates_in_place() {
        let (store, out, _, failures) = run_script("add Milk 01/01/2030\nedit 1\ntext Oat milk\nsave\n");
        assert_eq!(failures, 0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].text, "Oat milk");
        assert!(out.contains("Updated task"));
    }

    #[test]
    fn test_inline_confirmation_reads_next_line() {
        let (store, out, err, _) = run_script("add Milk 01/01/2030\ndelete 1\nn\ndelete milk\ny\n");
        assert!(store.is_empty());
        assert!(out.contains("Kept."));
        assert!(out.contains("Deleted."));
        assert_eq!(err.matches("Delete \"Milk\"? [y/N] ").count(), 2);
    }

    #[test]
    fn test_always_confirm_skips_prompt() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut runner = Runner::new(TaskStore::new(), "add A 01/01/2030\ndelete 1\n".as_bytes(), &mut out, &mut err)
            .confirm(ConfirmMode::Always);
        assert_eq!(runner.run().unwrap(), 0);
        assert!(runner.store().is_empty());
        drop(runner);
        assert!(err.is_empty());
    }

    #[test]
    fn test_unknown_reference_is_not_fatal() {
        let (store, _, err, failures) = run_script("toggle 4\nadd A 01/01/2030\n");
        assert_eq!(failures, 1);
        assert!(err.starts_with("line 1: no task at position 4"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_json_list_output() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        Runner::new(TaskStore::new(), "add A 01/01/2099\nlist\n".as_bytes(), &mut out, &mut err)
            .format(OutputFormat::Json)
            .run()
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        let json_line = out.lines().last().unwrap();
        let rows: serde_json::Value = serde_json::from_str(json_line).unwrap();
        assert_eq!(rows[0]["text"], "A");
        assert_eq!(rows[0]["overdue"], false);
    }
}
