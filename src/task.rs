//! Task data structure.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Opaque task identifier, randomly generated at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Eight-character prefix used in tables.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// A single entry in the list.
///
/// `due_date` holds exactly what the user typed (always ten characters once
/// saved). It is only interpreted as a calendar date when checking whether
/// the task is overdue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub due_date: Option<String>,
    pub done: bool,
}

impl Task {
    pub fn new(text: impl Into<String>, due_date: Option<String>) -> Self {
        Self {
            id: TaskId::new(),
            text: text.into(),
            due_date: due_date.filter(|d| !d.is_empty()),
            done: false,
        }
    }

    /// Due date as entered, or an empty string.
    pub fn due_str(&self) -> &str {
        self.due_date.as_deref().unwrap_or("")
    }
}
