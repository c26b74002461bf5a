//! The task store: the ordered task list plus the editor's draft state.
//!
//! Every front end drives the list through [`TaskStore`]. Operations run to
//! completion synchronously; the only failure is a [`ValidationError`] from
//! [`TaskStore::save`], which leaves the store untouched.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::confirm::Confirm;
use crate::date::{self, DUE_DATE_LEN};
use crate::error::ValidationError;
use crate::fields::{DatePolicy, EditorMode};
use crate::task::{Task, TaskId};

/// Transient input state. Never outlives the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    pub draft_text: String,
    pub draft_date: String,
    /// Task currently being edited. Clearing this never removes the task.
    pub editing_id: Option<TaskId>,
}

impl EditorState {
    pub fn mode(&self) -> EditorMode {
        if self.editing_id.is_some() {
            EditorMode::Edit
        } else {
            EditorMode::Create
        }
    }
}

/// What a successful save did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Saved {
    pub id: TaskId,
    pub created: bool,
}

/// In-memory list of tasks in display order, with the editor state.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    editor: EditorState,
    date_policy: DatePolicy,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_policy(date_policy: DatePolicy) -> Self {
        Self {
            date_policy,
            ..Self::default()
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn mode(&self) -> EditorMode {
        self.editor.mode()
    }

    pub fn date_policy(&self) -> DatePolicy {
        self.date_policy
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get a task by ID.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn set_draft_text(&mut self, text: impl Into<String>) {
        self.editor.draft_text = text.into();
    }

    pub fn set_draft_date(&mut self, date: impl Into<String>) {
        self.editor.draft_date = date.into();
    }

    /// Load a task into the drafts and switch to edit mode.
    pub fn begin_edit(&mut self, task: &Task) {
        self.editor = EditorState {
            draft_text: task.text.clone(),
            draft_date: task.due_str().to_string(),
            editing_id: Some(task.id),
        };
        debug!(id = %task.id, "editing task");
    }

    /// [`begin_edit`](Self::begin_edit) by id. Unknown ids are ignored.
    pub fn begin_edit_id(&mut self, id: TaskId) {
        if let Some(task) = self.get(id).cloned() {
            self.begin_edit(&task);
        }
    }

    /// Clear the drafts and return to create mode.
    pub fn cancel_edit(&mut self) {
        self.editor = EditorState::default();
    }

    /// Check the drafts without touching the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.editor.draft_text.trim().is_empty() {
            return Err(ValidationError::TextRequired);
        }
        if self.editor.draft_date.trim().is_empty() {
            return Err(ValidationError::DateRequired);
        }
        if self.editor.draft_date.chars().count() != DUE_DATE_LEN {
            return Err(ValidationError::InvalidDateFormat);
        }
        Ok(())
    }

    /// Commit the drafts: update the task under edit, or append a new one.
    ///
    /// On success the editor returns to create mode with empty drafts.
    pub fn save(&mut self) -> Result<Saved, ValidationError> {
        if let Err(e) = self.validate() {
            debug!(error = %e, "draft rejected");
            return Err(e);
        }

        let EditorState {
            draft_text,
            draft_date,
            editing_id,
        } = std::mem::take(&mut self.editor);
        let due_date = Some(draft_date);

        let saved = match editing_id {
            Some(id) => {
                // The task may have vanished since begin_edit; nothing to update then.
                if let Some(task) = self.get_mut(id) {
                    task.text = draft_text;
                    task.due_date = due_date;
                }
                info!(%id, "task updated");
                Saved { id, created: false }
            }
            None => {
                let task = Task::new(draft_text, due_date);
                let id = task.id;
                self.tasks.push(task);
                info!(%id, "task created");
                Saved { id, created: true }
            }
        };
        Ok(saved)
    }

    /// Flip `done` on a task. Unknown ids are ignored.
    pub fn toggle_done(&mut self, id: TaskId) {
        if let Some(task) = self.get_mut(id) {
            task.done = !task.done;
            info!(%id, done = task.done, "task toggled");
        }
    }

    /// Remove a task. Deleting the task under edit cancels the edit first.
    ///
    /// Callers are expected to have confirmed with the user already; see
    /// [`request_delete`](Self::request_delete).
    pub fn delete(&mut self, id: TaskId) {
        if self.editor.editing_id == Some(id) {
            self.cancel_edit();
        }
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() != before {
            info!(%id, "task deleted");
        }
    }

    /// Ask `confirm` and delete only on a yes. Returns whether a task was removed.
    pub fn request_delete(&mut self, id: TaskId, confirm: &mut dyn Confirm) -> bool {
        let Some(task) = self.get(id) else {
            return false;
        };
        if !confirm.confirm_delete(task) {
            debug!(%id, "delete declined");
            return false;
        }
        self.delete(id);
        true
    }

    /// Overdue relative to today's local date.
    pub fn is_overdue(&self, task: &Task) -> bool {
        self.is_overdue_on(task, date::today())
    }

    pub fn is_overdue_on(&self, task: &Task, today: NaiveDate) -> bool {
        date::is_overdue_on(task, today, self.date_policy)
    }
}

/// Every input event a front end can send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetDraftText(String),
    SetDraftDate(String),
    Save,
    BeginEdit(TaskId),
    CancelEdit,
    ToggleDone(TaskId),
    RequestDelete(TaskId),
    Delete(TaskId),
}

/// Result of applying an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Saved(Saved),
    Rejected(ValidationError),
    Deleted(bool),
    Applied,
}

/// Apply one action to a store and return the next store.
///
/// `confirm` is only consulted for [`Action::RequestDelete`].
pub fn reduce(mut store: TaskStore, action: Action, confirm: &mut dyn Confirm) -> (TaskStore, Outcome) {
    let outcome = store.apply(action, confirm);
    (store, outcome)
}

impl TaskStore {
    /// In-place form of [`reduce`].
    pub fn apply(&mut self, action: Action, confirm: &mut dyn Confirm) -> Outcome {
        match action {
            Action::SetDraftText(s) => {
                self.set_draft_text(s);
                Outcome::Applied
            }
            Action::SetDraftDate(s) => {
                self.set_draft_date(s);
                Outcome::Applied
            }
            Action::Save => match self.save() {
                Ok(saved) => Outcome::Saved(saved),
                Err(e) => Outcome::Rejected(e),
            },
            Action::BeginEdit(id) => {
                self.begin_edit_id(id);
                Outcome::Applied
            }
            Action::CancelEdit => {
                self.cancel_edit();
                Outcome::Applied
            }
            Action::ToggleDone(id) => {
                self.toggle_done(id);
                Outcome::Applied
            }
            Action::RequestDelete(id) => Outcome::Deleted(self.request_delete(id, confirm)),
            Action::Delete(id) => {
                let existed = self.get(id).is_some();
                self.delete(id);
                Outcome::Deleted(existed)
            }
        }
    }
}
