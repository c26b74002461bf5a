//! Integration tests for a full task-list session
//!
//! These drive the store through the public API the front ends use: drafts,
//! save in both modes, toggling, confirmed deletes, and overdue rendering.

use chrono::{Datelike, Duration, Local};
use todolist::confirm::AlwaysConfirm;
use todolist::date::format_due;
use todolist::error::ValidationError;
use todolist::fields::{DatePolicy, EditorMode};
use todolist::store::{reduce, Action, Outcome, TaskStore};
use todolist::task::Task;
use todolist::view::{RowStatus, StoreView, EMPTY_LIST_MESSAGE};

fn days_from_today(days: i64) -> String {
    format_due(Local::now().date_naive() + Duration::days(days))
}

#[test]
fn test_create_edit_toggle_delete_session() {
    let mut store = TaskStore::new();
    assert!(StoreView::of(&store).rows.is_empty());

    store.set_draft_text("Pay rent");
    store.set_draft_date(days_from_today(-1));
    let rent = store.save().unwrap();
    assert!(rent.created);

    store.set_draft_text("Buy milk");
    store.set_draft_date(days_from_today(3));
    let milk = store.save().unwrap().id;

    let view = StoreView::of(&store);
    assert_eq!(view.rows[0].status, RowStatus::Overdue);
    assert_eq!(view.rows[1].status, RowStatus::Pending);
    assert_eq!(view.rows[1].due_relative, "in 3d");

    store.begin_edit_id(milk);
    assert_eq!(store.mode(), EditorMode::Edit);
    store.set_draft_text("Buy oat milk");
    let updated = store.save().unwrap();
    assert!(!updated.created);
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(milk).unwrap().text, "Buy oat milk");

    store.toggle_done(rent.id);
    assert!(!store.is_overdue(store.get(rent.id).unwrap()));
    assert_eq!(StoreView::of(&store).rows[0].status, RowStatus::Done);

    let mut asked = Vec::new();
    let deleted = store.request_delete(rent.id, &mut |t: &Task| {
        asked.push(t.text.clone());
        false
    });
    assert!(!deleted);
    assert_eq!(asked, ["Pay rent"]);
    assert_eq!(store.len(), 2);

    assert!(store.request_delete(rent.id, &mut AlwaysConfirm));
    assert_eq!(store.tasks().iter().map(|t| t.id).collect::<Vec<_>>(), [milk]);
}

#[test]
fn test_rejected_saves_keep_drafts_and_tasks() {
    let mut store = TaskStore::new();
    store.set_draft_date("01/01/2030");
    assert_eq!(store.save(), Err(ValidationError::TextRequired));

    store.set_draft_text("Call mum");
    store.set_draft_date("");
    assert_eq!(store.save(), Err(ValidationError::DateRequired));

    store.set_draft_date("1/1/2030");
    assert_eq!(store.save(), Err(ValidationError::InvalidDateFormat));

    assert!(store.is_empty());
    assert_eq!(store.editor().draft_text, "Call mum");
    assert_eq!(store.editor().draft_date, "1/1/2030");
}

#[test]
fn test_reducer_replays_a_session() {
    let actions = vec![
        Action::SetDraftText("Water plants".into()),
        Action::SetDraftDate(days_from_today(0)),
        Action::Save,
        Action::Save,
    ];
    let mut store = TaskStore::new();
    let mut outcomes = Vec::new();
    for action in actions {
        let (next, outcome) = reduce(store, action, &mut AlwaysConfirm);
        store = next;
        outcomes.push(outcome);
    }
    assert!(matches!(outcomes[2], Outcome::Saved(s) if s.created));
    assert_eq!(outcomes[3], Outcome::Rejected(ValidationError::TextRequired));

    let id = store.tasks()[0].id;
    // Due today is not overdue.
    assert!(!store.is_overdue(&store.tasks()[0]));

    let (store, outcome) = reduce(store, Action::RequestDelete(id), &mut |_: &Task| true);
    assert_eq!(outcome, Outcome::Deleted(true));
    assert!(store.is_empty());
}

#[test]
fn test_rollover_dates_depend_on_policy() {
    // 32/01 of last year rolls over to 1 February under the lenient reading.
    let last_year = Local::now().date_naive().year() - 1;
    let odd = format!("32/01/{last_year}");

    for (policy, overdue) in [(DatePolicy::Lenient, true), (DatePolicy::Strict, false)] {
        let mut store = TaskStore::with_date_policy(policy);
        store.set_draft_text("Odd date");
        store.set_draft_date(odd.clone());
        store.save().unwrap();
        assert_eq!(store.is_overdue(&store.tasks()[0]), overdue, "{policy:?}");
    }
}

#[test]
fn test_empty_message_constant() {
    assert_eq!(EMPTY_LIST_MESSAGE, "No tasks yet.");
}
