//! Enumerations for TUI state management.

/// Which screen layer is receiving keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    TaskList,
    Help,
    Confirm,
}

/// Which widget on the main screen has the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Text,
    Date,
    List,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Text => Focus::Date,
            Focus::Date => Focus::List,
            Focus::List => Focus::Text,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Text => Focus::List,
            Focus::Date => Focus::Text,
            Focus::List => Focus::Date,
        }
    }

    pub fn is_input(self) -> bool {
        matches!(self, Focus::Text | Focus::Date)
    }
}
