//! Integration tests for the line-command runner behind `todo run`

use todolist::cmd::{ConfirmMode, Runner};
use todolist::fields::OutputFormat;
use todolist::store::TaskStore;

fn run(script: &str, confirm: ConfirmMode, format: OutputFormat) -> (TaskStore, String, String, usize) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut runner = Runner::new(TaskStore::new(), script.as_bytes(), &mut out, &mut err)
        .confirm(confirm)
        .format(format);
    let failures = runner.run().unwrap();
    let store = runner.into_store();
    (store, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap(), failures)
}

#[test]
fn test_scripted_session_end_to_end() {
    let script = r#"
# morning list
add "Pay rent" 01/01/2000
add "Buy milk" 01/01/2099
toggle "buy milk"
edit 1
text Pay the rent
save
show
"#;
    let (store, out, err, failures) = run(script, ConfirmMode::Always, OutputFormat::Table);
    assert_eq!(failures, 0, "{err}");
    assert_eq!(store.len(), 2);
    assert_eq!(store.tasks()[0].text, "Pay the rent");
    assert!(store.tasks()[1].done);

    assert!(out.contains("Pay the rent (Overdue!)"));
    assert!(!out.contains("Buy milk (Overdue!)"));
    assert!(out.contains("Task "));
    assert!(out.contains("marked done"));
    assert!(out.trim_end().ends_with(r#"Mode: create | text: "" | date: """#));
}

#[test]
fn test_cancelled_edit_saves_as_new_task() {
    let script = "add A 01/01/2099\nedit 1\ncancel\ntext B\ndate 02/02/2099\nsave\n";
    let (store, _, _, failures) = run(script, ConfirmMode::Always, OutputFormat::Table);
    assert_eq!(failures, 0);
    assert_eq!(store.len(), 2);
    assert_eq!(store.tasks()[0].text, "A");
    assert_eq!(store.tasks()[1].text, "B");
}

#[test]
fn test_deleting_the_task_under_edit_leaves_create_mode() {
    let script = "add A 01/01/2099\nedit 1\ndelete 1\ny\nshow\n";
    let (store, out, _, failures) = run(script, ConfirmMode::Inline, OutputFormat::Table);
    assert_eq!(failures, 0);
    assert!(store.is_empty());
    assert!(out.contains("No tasks yet."));
    assert!(out.contains("Mode: create"));
}

#[test]
fn test_show_as_json() {
    let script = "text Draft only\nshow\n";
    let (_, out, _, _) = run(script, ConfirmMode::Always, OutputFormat::Json);
    let view: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(view["draft_text"], "Draft only");
    assert_eq!(view["mode"], "create");
    assert_eq!(view["rows"].as_array().unwrap().len(), 0);
}
