//! Confirmation capability injected into destructive store operations.
//!
//! The store asks before deleting but never decides how to ask. Front ends
//! pass whatever fits their host: a terminal prompt, a fixed answer, or a
//! closure in tests.

use std::io::{self, BufRead, Write};

use crate::task::Task;

/// Answers "really delete this task?".
pub trait Confirm {
    fn confirm_delete(&mut self, task: &Task) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&Task) -> bool,
{
    fn confirm_delete(&mut self, task: &Task) -> bool {
        self(task)
    }
}

/// Always answers yes. Used for `--yes` and `confirm_delete = false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm_delete(&mut self, _task: &Task) -> bool {
        true
    }
}

/// Asks on a writer and reads a `y`/`yes` answer from a reader.
///
/// Anything other than an explicit yes, including EOF and read errors,
/// counts as no.
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl PromptConfirm<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr, answer from stdin.
    pub fn terminal() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm_delete(&mut self, task: &Task) -> bool {
        if write!(self.output, "Delete \"{}\"? [y/N] ", task.text)
            .and_then(|_| self.output.flush())
            .is_err()
        {
            return false;
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(answer: &str) -> (bool, String) {
        let mut out = Vec::new();
        let yes = PromptConfirm::new(answer.as_bytes(), &mut out).confirm_delete(&Task::new("Buy milk", None));
        (yes, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_prompt_accepts_y_and_yes() {
        assert!(ask("y\n").0);
        assert!(ask("YES\n").0);
    }

    #[test]
    fn test_prompt_defaults_to_no() {
        assert!(!ask("\n").0);
        assert!(!ask("nope\n").0);
        assert!(!ask("").0);
    }

    #[test]
    fn test_prompt_names_the_task() {
        assert_eq!(ask("n\n").1, "Delete \"Buy milk\"? [y/N] ");
    }

    #[test]
    fn test_closure_is_a_confirm() {
        let mut asked = 0;
        let mut confirm = |_: &Task| {
            asked += 1;
            false
        };
        assert!(!confirm.confirm_delete(&Task::new("x", None)));
        drop(confirm);
        assert_eq!(asked, 1);
    }
}
