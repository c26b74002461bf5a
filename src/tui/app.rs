//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the task store, turns key
//! presses into store operations, and renders the single task-list screen
//! (input row, task table, status bar) plus the help and confirm overlays.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use crate::config::Config;
use crate::date::DUE_DATE_LEN;
use crate::fields::EditorMode;
use crate::store::TaskStore;
use crate::task::{Task, TaskId};
use crate::tui::{
    colors::{BORDER, DANGER, EDIT, PRIMARY, SUCCESS, TEXT_DONE, TEXT_LIGHT},
    enums::{AppState, Focus},
    input::InputField,
    utils::centered_rect,
};
use crate::view::{truncate, RowStatus, StoreView, TaskRow, EMPTY_LIST_MESSAGE};

/// Shown instead of the empty-list message when every task is done and done tasks are hidden.
const ALL_HIDDEN_MESSAGE: &str = "All tasks completed (c to show)";

/// TUI state: the store plus everything needed to draw and drive it.
pub struct App {
    state: AppState,
    store: TaskStore,
    focus: Focus,
    text_input: InputField,
    date_input: InputField,
    task_list_state: TableState,
    /// Ids of the rows currently shown, in display order.
    visible_tasks: Vec<TaskId>,
    show_completed: bool,
    confirm_delete: bool,
    pending_delete: Option<TaskId>,
    status_message: String,
    status_is_error: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let mut app = App {
            state: AppState::TaskList,
            store: TaskStore::with_date_policy(config.date_policy),
            focus: Focus::Text,
            text_input: InputField::new(),
            date_input: InputField::with_max_len(DUE_DATE_LEN),
            task_list_state: TableState::default(),
            visible_tasks: Vec::new(),
            show_completed: config.show_completed,
            confirm_delete: config.confirm_delete,
            pending_delete: None,
            status_message: String::new(),
            status_is_error: false,
        };
        app.update_visible_tasks();
        app
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
        self.status_is_error = false;
    }

    fn set_error_message(&mut self, msg: String) {
        self.status_message = msg;
        self.status_is_error = true;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
        self.status_is_error = false;
    }

    /// Recompute which tasks are listed, keeping the selection on the same task when possible.
    fn update_visible_tasks(&mut self) {
        let old_selected_id = self.selected_task_id();

        self.visible_tasks = self
            .store
            .tasks()
            .iter()
            .filter(|t| self.show_completed || !t.done)
            .map(|t| t.id)
            .collect();

        let new_idx = old_selected_id
            .and_then(|id| self.visible_tasks.iter().position(|&v| v == id))
            .or_else(|| {
                let last = self.visible_tasks.len().checked_sub(1)?;
                Some(self.task_list_state.selected().unwrap_or(0).min(last))
            });
        self.task_list_state.select(new_idx);
    }

    fn selected_task_id(&self) -> Option<TaskId> {
        self.task_list_state
            .selected()
            .and_then(|idx| self.visible_tasks.get(idx))
            .copied()
    }

    /// Copy the store's drafts into the input widgets.
    fn sync_inputs_from_store(&mut self) {
        let editor = self.store.editor();
        let (text, date) = (editor.draft_text.clone(), editor.draft_date.clone());
        self.text_input.set_value(&text);
        self.date_input.set_value(&date);
    }

    fn push_drafts_to_store(&mut self) {
        self.store.set_draft_text(self.text_input.value.clone());
        self.store.set_draft_date(self.date_input.value.clone());
    }

    fn save(&mut self) {
        self.push_drafts_to_store();
        match self.store.save() {
            Ok(saved) => {
                self.sync_inputs_from_store();
                self.update_visible_tasks();
                if let Some(idx) = self.visible_tasks.iter().position(|&id| id == saved.id) {
                    self.task_list_state.select(Some(idx));
                }
                self.focus = Focus::Text;
                self.set_status_message(if saved.created { "Task added".into() } else { "Task updated".into() });
            }
            Err(e) => self.set_error_message(e.alert()),
        }
    }

    fn begin_edit_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.store.begin_edit_id(id);
            self.sync_inputs_from_store();
            self.focus = Focus::Text;
            self.set_status_message("Editing task (Enter to save, Esc to cancel)".into());
        }
    }

    fn cancel_edit(&mut self) {
        self.store.cancel_edit();
        self.sync_inputs_from_store();
        self.set_status_message("Edit cancelled".into());
    }

    fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.store.toggle_done(id);
            self.update_visible_tasks();
        }
    }

    fn request_delete_selected(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        if self.confirm_delete {
            self.pending_delete = Some(id);
            self.state = AppState::Confirm;
        } else {
            self.finish_delete(id, true);
        }
    }

    /// Hand the dialog's answer to the store as its confirmation.
    fn finish_delete(&mut self, id: TaskId, answer: bool) {
        let was_editing = self.store.editor().editing_id == Some(id);
        let deleted = self.store.request_delete(id, &mut |_: &Task| answer);
        if deleted {
            if was_editing {
                self.sync_inputs_from_store();
            }
            self.update_visible_tasks();
            self.set_status_message("Task deleted".into());
        }
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.focus {
            Focus::Text => Some(&mut self.text_input),
            Focus::Date => Some(&mut self.date_input),
            Focus::List => None,
        }
    }

    /// Handle one key press. Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        match self.state {
            AppState::TaskList => self.handle_task_list_input(key),
            AppState::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q' | 'h' | '?')) {
                    self.state = AppState::TaskList;
                }
                false
            }
            AppState::Confirm => {
                self.handle_confirm_input(key.code);
                false
            }
        }
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        let answer = match key {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => true,
            KeyCode::Char('n' | 'N') | KeyCode::Esc => false,
            _ => return,
        };
        if let Some(id) = self.pending_delete.take() {
            self.finish_delete(id, answer);
        }
        self.state = AppState::TaskList;
    }

    fn handle_task_list_input(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return false;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return false;
            }
            _ => {}
        }
        if self.focus.is_input() {
            self.handle_input_field_key(key);
            false
        } else {
            self.handle_list_key(key)
        }
    }

    fn handle_input_field_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.save(),
            KeyCode::Esc => {
                if self.store.mode() == EditorMode::Edit {
                    self.cancel_edit();
                } else {
                    self.push_drafts_to_store();
                    self.focus = Focus::List;
                }
            }
            KeyCode::Down => self.focus = Focus::List,
            code => {
                let Some(field) = self.active_input() else {
                    return;
                };
                match code {
                    KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                        field.handle_char(c);
                    }
                    KeyCode::Backspace => field.handle_backspace(),
                    KeyCode::Delete => field.handle_delete(),
                    KeyCode::Left => field.move_cursor_left(),
                    KeyCode::Right => field.move_cursor_right(),
                    KeyCode::Home => field.move_cursor_home(),
                    KeyCode::End => field.move_cursor_end(),
                    _ => return,
                }
                self.push_drafts_to_store();
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.store.mode() == EditorMode::Edit {
                    self.cancel_edit();
                } else {
                    return true;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => match self.task_list_state.selected() {
                Some(0) | None => self.focus = Focus::Date,
                Some(selected) => self.task_list_state.select(Some(selected - 1)),
            },
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(selected) = self.task_list_state.selected() {
                    if selected + 1 < self.visible_tasks.len() {
                        self.task_list_state.select(Some(selected + 1));
                    }
                } else if !self.visible_tasks.is_empty() {
                    self.task_list_state.select(Some(0));
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('e') => self.begin_edit_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.request_delete_selected(),
            KeyCode::Char('a') | KeyCode::Char('i') => self.focus = Focus::Text,
            KeyCode::Char('c') => {
                self.show_completed = !self.show_completed;
                self.update_visible_tasks();
                self.set_status_message(if self.show_completed {
                    "Showing completed tasks".into()
                } else {
                    "Hiding completed tasks".into()
                });
            }
            KeyCode::Char('h') | KeyCode::Char('?') => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    /// Poll for and handle one keyboard event.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(false);
                }
                if self.state == AppState::TaskList {
                    self.clear_status_message();
                }
                debug!(code = ?key.code, "key pressed");
                return Ok(self.handle_key(key));
            }
        }
        Ok(false)
    }

    fn render_header(&self, f: &mut Frame, area: Rect, view: &StoreView) {
        let overdue = view.rows.iter().filter(|r| r.overdue).count();
        let done = view.rows.iter().filter(|r| r.done).count();
        let header = Paragraph::new(Line::from(vec![
            Span::styled("TODO LIST", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("{} tasks, {} done, {} overdue", view.rows.len(), done, overdue),
                Style::default().add_modifier(Modifier::ITALIC),
            ),
        ]))
        .style(Style::default().bg(PRIMARY).fg(Color::White))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_input(&self, f: &mut Frame, area: Rect, field: &InputField, title: &str, placeholder: &str, focused: bool) {
        let border = if focused { Style::default().fg(EDIT) } else { Style::default().fg(BORDER) };
        let line = if field.is_empty() && !focused {
            Line::from(Span::styled(placeholder, Style::default().fg(TEXT_LIGHT)))
        } else if focused {
            let (before, at, after) = field.split_at_cursor();
            let cursor = at.map(String::from).unwrap_or_else(|| " ".to_string());
            Line::from(vec![
                Span::raw(before),
                Span::styled(cursor, Style::default().add_modifier(Modifier::REVERSED)),
                Span::raw(after),
            ])
        } else {
            Line::from(field.value.as_str())
        };
        let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL).border_style(border).title(title));
        f.render_widget(paragraph, area);
    }

    fn render_input_row(&self, f: &mut Frame, area: Rect) {
        let editing = self.store.mode() == EditorMode::Edit;
        let mut constraints = vec![Constraint::Min(20), Constraint::Length(14), Constraint::Length(10)];
        if editing {
            constraints.push(Constraint::Length(12));
        }
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        self.render_input(f, chunks[0], &self.text_input, "Task", "What needs doing?", self.focus == Focus::Text);
        self.render_input(f, chunks[1], &self.date_input, "Due", "DD/MM/YYYY", self.focus == Focus::Date);

        let (label, color) = if editing { ("✓ Save", SUCCESS) } else { ("+ Add", PRIMARY) };
        let save = Paragraph::new(label)
            .style(Style::default().fg(Color::White).bg(color).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).title("Enter"))
            .alignment(Alignment::Center);
        f.render_widget(save, chunks[2]);

        if editing {
            let cancel = Paragraph::new("✗ Cancel")
                .style(Style::default().fg(Color::White).bg(TEXT_LIGHT))
                .block(Block::default().borders(Borders::ALL).title("Esc"))
                .alignment(Alignment::Center);
            f.render_widget(cancel, chunks[3]);
        }
    }

    fn task_row<'a>(row: &'a TaskRow, text_width: usize) -> Row<'a> {
        let mut due = row.due_date.clone().map(|d| format!("📅 {d}")).unwrap_or_default();
        if row.overdue {
            due.push_str(" (Overdue!)");
        }

        let mut text_style = Style::default();
        if row.done {
            text_style = text_style.fg(TEXT_DONE).add_modifier(Modifier::CROSSED_OUT);
        } else if row.overdue {
            text_style = text_style.fg(DANGER).add_modifier(Modifier::BOLD);
        }

        let mut style = Style::default();
        if row.editing {
            style = style.fg(EDIT).add_modifier(Modifier::BOLD);
        }
        let due_style = if row.overdue {
            Style::default().fg(DANGER).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_LIGHT)
        };
        let marker_style = match row.status {
            RowStatus::Done => Style::default().fg(SUCCESS),
            RowStatus::Overdue => Style::default().fg(DANGER),
            RowStatus::Pending => Style::default(),
        };

        Row::new(vec![
            Cell::from(row.position.to_string()),
            Cell::from(Span::styled(row.status.icon(), marker_style)),
            Cell::from(Span::styled(truncate(&row.text, text_width), text_style)),
            Cell::from(Span::styled(due, due_style)),
            Cell::from(row.due_relative.clone()),
        ])
        .style(style)
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect, view: &StoreView) {
        let title = format!(
            "Tasks ({}/{}){} - Press 'h' for help",
            self.visible_tasks.len(),
            view.rows.len(),
            if self.show_completed { "" } else { " [hiding done]" }
        );
        let border = if self.focus == Focus::List { Style::default().fg(EDIT) } else { Style::default() };
        let block = Block::default().borders(Borders::ALL).border_style(border).title(title);

        if self.visible_tasks.is_empty() {
            let message = if view.rows.is_empty() { EMPTY_LIST_MESSAGE } else { ALL_HIDDEN_MESSAGE };
            let empty = Paragraph::new(message)
                .style(Style::default().fg(TEXT_LIGHT))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(empty, area);
            return;
        }

        let text_width = usize::from(area.width.saturating_sub(45)).max(10);
        let rows: Vec<Row> = view
            .rows
            .iter()
            .filter(|r| self.visible_tasks.contains(&r.id))
            .map(|r| Self::task_row(r, text_width))
            .collect();
        let header = Row::new(["#", "", "Task", "Due", "When"].map(|h| Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))))
            .style(Style::default().bg(PRIMARY).fg(Color::White));
        let widths = [
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(25),
            Constraint::Length(10),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");
        f.render_stateful_widget(table, area, &mut self.task_list_state);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let help_text = vec![
            Line::from(Span::styled("Todo List Help", bold)),
            Line::from(""),
            Line::from(Span::styled("Inputs:", bold)),
            Line::from("  Tab/Shift+Tab  Move between task, date and list"),
            Line::from("  Enter          Add task (or save the task being edited)"),
            Line::from("  Esc            Cancel edit / go to list"),
            Line::from(""),
            Line::from(Span::styled("Task List:", bold)),
            Line::from("  ↑/↓, k/j       Navigate tasks"),
            Line::from("  Enter/Space    Toggle done"),
            Line::from("  e              Edit selected task"),
            Line::from("  d/Delete       Delete selected task"),
            Line::from("  a/i            Focus the task input"),
            Line::from("  c              Show/hide completed tasks"),
            Line::from("  h/?            Show this help"),
            Line::from("  q/Esc/Ctrl+C   Quit"),
            Line::from(""),
            Line::from(Span::styled("Due Dates:", bold)),
            Line::from("  DD/MM/YYYY     Required, exactly 10 characters (e.g., 25/12/2030)"),
        ];
        let area = centered_rect(70, 80, area);
        f.render_widget(Clear, area);
        let paragraph = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Help - Esc to return"))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    /// Render a confirmation dialog before deleting.
    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let task_text = self
            .pending_delete
            .and_then(|id| self.store.get(id))
            .map(|t| t.text.clone())
            .unwrap_or_default();
        let block = Block::default()
            .title("Delete")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(DANGER));

        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Really delete this task?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(task_text),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let (text, style) = if !self.status_message.is_empty() {
            let bg = if self.status_is_error { DANGER } else { PRIMARY };
            (self.status_message.clone(), Style::default().bg(bg).fg(Color::White))
        } else {
            let hint = match (self.state, self.focus) {
                (AppState::Help, _) => "Help",
                (AppState::Confirm, _) => "Confirm delete",
                (_, Focus::Text) => "Type the task | Tab: date | Enter: save",
                (_, Focus::Date) => "Due date DD/MM/YYYY | Tab: list | Enter: save",
                (_, Focus::List) => "Space: toggle | e: edit | d: delete | h: help",
            };
            (hint.to_string(), Style::default().bg(PRIMARY).fg(Color::White))
        };
        f.render_widget(Paragraph::new(text).style(style), area);
    }

    /// Main render function that dispatches to the screen and any overlay.
    pub fn render(&mut self, f: &mut Frame) {
        let view = StoreView::of(&self.store);
        let area = f.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_header(f, chunks[0], &view);
        self.render_input_row(f, chunks[1]);
        self.render_task_list(f, chunks[2], &view);
        match self.state {
            AppState::TaskList => {}
            AppState::Help => self.render_help(f, area),
            AppState::Confirm => self.render_confirm(f, chunks[2]),
        }
        self.render_status_bar(f, chunks[3]);
    }

    /// Main event loop for the TUI application.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
