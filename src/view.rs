//! Render-ready snapshot of the store.
//!
//! Front ends never compute overdue flags or editor mode themselves; they
//! take a [`StoreView`] and draw it.

use chrono::NaiveDate;
use serde::Serialize;

use crate::date::{self, format_due_relative};
use crate::fields::EditorMode;
use crate::store::TaskStore;
use crate::task::{Task, TaskId};

pub const EMPTY_LIST_MESSAGE: &str = "No tasks yet.";

/// Per-row marker: done, overdue or still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowStatus {
    Done,
    Overdue,
    Pending,
}

impl RowStatus {
    pub fn icon(self) -> &'static str {
        match self {
            RowStatus::Done => "✅",
            RowStatus::Overdue => "⚠",
            RowStatus::Pending => "⏳",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    /// 1-based display position.
    pub position: usize,
    pub id: TaskId,
    pub text: String,
    pub due_date: Option<String>,
    /// "today", "in 3d", "2d late", or "-" when the date cannot be read.
    pub due_relative: String,
    pub done: bool,
    pub overdue: bool,
    pub editing: bool,
    pub status: RowStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreView {
    pub rows: Vec<TaskRow>,
    pub draft_text: String,
    pub draft_date: String,
    pub mode: EditorMode,
}

impl StoreView {
    pub fn of(store: &TaskStore) -> Self {
        Self::of_on(store, date::today())
    }

    pub fn of_on(store: &TaskStore, today: NaiveDate) -> Self {
        let editor = store.editor();
        let rows = store
            .tasks()
            .iter()
            .enumerate()
            .map(|(i, task)| row(store, task, i + 1, today))
            .collect();
        Self {
            rows,
            draft_text: editor.draft_text.clone(),
            draft_date: editor.draft_date.clone(),
            mode: editor.mode(),
        }
    }
}

fn row(store: &TaskStore, task: &Task, position: usize, today: NaiveDate) -> TaskRow {
    let overdue = store.is_overdue_on(task, today);
    let status = if task.done {
        RowStatus::Done
    } else if overdue {
        RowStatus::Overdue
    } else {
        RowStatus::Pending
    };
    let parsed = task
        .due_date
        .as_deref()
        .and_then(|d| date::parse_due(d, store.date_policy()));
    TaskRow {
        position,
        id: task.id,
        text: task.text.clone(),
        due_date: task.due_date.clone(),
        due_relative: format_due_relative(parsed, today),
        done: task.done,
        overdue,
        editing: store.editor().editing_id == Some(task.id),
        status,
    }
}

/// Rows as a plain-text table, or the empty-list message.
pub fn render_rows(view: &StoreView) -> String {
    if view.rows.is_empty() {
        return format!("{EMPTY_LIST_MESSAGE}\n");
    }
    let mut out = format!(
        "{:<3} {:<9} {:<2} {:<10} {:<9} {}\n",
        "#", "ID", "", "Due", "When", "Task"
    );
    for r in &view.rows {
        let mut text = r.text.clone();
        if r.overdue {
            text.push_str(" (Overdue!)");
        }
        if r.editing {
            text.push_str(" [editing]");
        }
        out.push_str(&format!(
            "{:<3} {:<9} {:<2} {:<10} {:<9} {}\n",
            r.position,
            r.id.short(),
            r.status.icon(),
            r.due_date.as_deref().unwrap_or("-"),
            r.due_relative,
            text
        ));
    }
    out
}

/// One line describing the editor: mode and draft buffers.
pub fn render_editor(view: &StoreView) -> String {
    let mode = match view.mode {
        EditorMode::Create => "create",
        EditorMode::Edit => "edit",
    };
    format!(
        "Mode: {} | text: \"{}\" | date: \"{}\"\n",
        mode, view.draft_text, view.draft_date
    )
}

/// Rows followed by the editor line.
pub fn render_table(view: &StoreView) -> String {
    format!("{}{}", render_rows(view), render_editor(view))
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> (TaskStore, TaskId, TaskId) {
        let mut store = TaskStore::new();
        store.set_draft_text("Pay rent");
        store.set_draft_date("01/06/2030");
        let late = store.save().unwrap().id;
        store.set_draft_text("Buy milk");
        store.set_draft_date("20/06/2030");
        let soon = store.save().unwrap().id;
        (store, late, soon)
    }

    #[test]
    fn test_rows_follow_store_order_and_flag_overdue() {
        let (store, late, soon) = sample();
        let view = StoreView::of_on(&store, ymd(2030, 6, 10));

        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].id, late);
        assert_eq!(view.rows[0].position, 1);
        assert!(view.rows[0].overdue);
        assert_eq!(view.rows[0].status, RowStatus::Overdue);
        assert_eq!(view.rows[0].due_relative, "9d late");

        assert_eq!(view.rows[1].id, soon);
        assert!(!view.rows[1].overdue);
        assert_eq!(view.rows[1].status, RowStatus::Pending);
        assert_eq!(view.rows[1].due_relative, "in 10d");
    }

    #[test]
    fn test_done_row_is_not_overdue() {
        let (mut store, late, _) = sample();
        store.toggle_done(late);
        let view = StoreView::of_on(&store, ymd(2030, 6, 10));
        assert_eq!(view.rows[0].status, RowStatus::Done);
        assert!(!view.rows[0].overdue);
    }

    #[test]
    fn test_view_reports_edit_mode_and_editing_row() {
        let (mut store, _, soon) = sample();
        store.begin_edit_id(soon);
        let view = StoreView::of_on(&store, ymd(2030, 6, 10));
        assert_eq!(view.mode, EditorMode::Edit);
        assert_eq!(view.draft_text, "Buy milk");
        assert_eq!(view.draft_date, "20/06/2030");
        assert!(!view.rows[0].editing);
        assert!(view.rows[1].editing);
    }

    #[test]
    fn test_table_marks_overdue_and_empty_state() {
        let (store, _, _) = sample();
        let table = render_table(&StoreView::of_on(&store, ymd(2030, 6, 10)));
        assert!(table.contains("Pay rent (Overdue!)"));
        assert!(!table.contains("Buy milk (Overdue!)"));
        assert!(table.ends_with("Mode: create | text: \"\" | date: \"\"\n"));

        let empty = render_table(&StoreView::of_on(&TaskStore::new(), ymd(2030, 6, 10)));
        assert!(empty.starts_with(EMPTY_LIST_MESSAGE));
    }

    #[test]
    fn test_view_serializes_to_json() {
        let (store, _, _) = sample();
        let json = serde_json::to_value(StoreView::of_on(&store, ymd(2030, 6, 10))).unwrap();
        assert_eq!(json["mode"], "create");
        assert_eq!(json["rows"][0]["status"], "overdue");
        assert_eq!(json["rows"][1]["due_date"], "20/06/2030");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title", 6), "a lon…");
    }
}
