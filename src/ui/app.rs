//! Main TUI application state and logic

use crate::departments::apply_departments;
use crate::form::{FormState, SubmitOutcome};
use crate::records::{export_csv, search, write_export, RecordBook};
use crate::schema::editor::{
    add_new_field, is_locked, remove_field, update_field_property, DraftErrors, DraftField,
    FieldProperty,
};
use crate::schema::{FieldType, FormConfig, SelectOption};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{error, info};

/// The three tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Form,
    Records,
    Config,
}

impl View {
    pub const ALL: [View; 3] = [View::Form, View::Records, View::Config];

    pub fn next(self) -> Self {
        match self {
            View::Form => View::Records,
            View::Records => View::Config,
            View::Config => View::Form,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            View::Form => View::Config,
            View::Records => View::Form,
            View::Config => View::Records,
        }
    }

    pub fn index(self) -> usize {
        match self {
            View::Form => 0,
            View::Records => 1,
            View::Config => 2,
        }
    }
}

/// Stacked cards or one wide table; same data either way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordsLayout {
    Cards,
    Table,
}

/// Which control of the add-field dialog has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogFocus {
    Id,
    Label,
    Type,
    Required,
    MinLength,
    OptionValue,
    OptionLabel,
    Options,
    Confirm,
}

/// State of the "add field" dialog
#[derive(Debug, Clone, Default)]
pub struct AddFieldDialog {
    pub draft: DraftField,
    pub errors: DraftErrors,
    pub focus_index: usize,
    pub option_value: String,
    pub option_label: String,
    pub option_selected: usize,
}

impl AddFieldDialog {
    /// Controls that apply to the draft's current type, in tab order
    pub fn controls(&self) -> Vec<DialogFocus> {
        let mut controls = vec![DialogFocus::Id, DialogFocus::Label, DialogFocus::Type];
        if self.draft.field_type == FieldType::Select {
            controls.extend([
                DialogFocus::OptionValue,
                DialogFocus::OptionLabel,
                DialogFocus::Options,
            ]);
        }
        controls.push(DialogFocus::Required);
        if self.draft.field_type.supports_min_length() {
            controls.push(DialogFocus::MinLength);
        }
        controls.push(DialogFocus::Confirm);
        controls
    }

    pub fn focus(&self) -> DialogFocus {
        let controls = self.controls();
        controls[self.focus_index.min(controls.len() - 1)]
    }

    fn move_focus(&mut self, forward: bool) {
        let len = self.controls().len();
        self.focus_index = if forward {
            (self.focus_index + 1) % len
        } else {
            (self.focus_index + len - 1) % len
        };
    }

    fn add_pending_option(&mut self) {
        if self
            .draft
            .add_option(self.option_value.trim(), self.option_label.trim())
        {
            self.option_value.clear();
            self.option_label.clear();
            self.option_selected = self.draft.options.len() - 1;
        }
    }
}

/// The main application state
pub struct App {
    /// Current form schema
    pub config: FormConfig,

    /// Values, errors and submission phase of the entry form
    pub form: FormState,

    /// All records registered this session
    pub records: RecordBook,

    /// Active tab
    pub view: View,

    /// Focused form control; `config.fields.len()` is the submit button
    pub form_focus: usize,

    /// Records search term
    pub search_term: String,

    pub records_layout: RecordsLayout,
    pub records_scroll: usize,

    /// Selected field in the configuration view
    pub config_selected: usize,

    /// Open add-field dialog, if any
    pub dialog: Option<AddFieldDialog>,

    /// Where exports are written
    pub export_dir: PathBuf,

    /// Pending department lookup
    departments: Option<oneshot::Receiver<Vec<SelectOption>>>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    pub fn new(config: FormConfig, export_dir: PathBuf) -> Self {
        let form = FormState::new(&config);
        App {
            config,
            form,
            records: RecordBook::new(),
            view: View::Form,
            form_focus: 0,
            search_term: String::new(),
            records_layout: RecordsLayout::Table,
            records_scroll: 0,
            config_selected: 0,
            dialog: None,
            export_dir,
            departments: None,
            should_quit: false,
            status_message: String::from("Listo"),
        }
    }

    /// Receive department options from a background lookup
    pub fn with_departments(mut self, rx: oneshot::Receiver<Vec<SelectOption>>) -> Self {
        self.departments = Some(rx);
        self
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.tick(Instant::now());
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Poll with timeout so submissions and the banner advance on their own
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key, Instant::now());
                    }
                }
            }
        }

        Ok(())
    }

    /// Advance time-driven state: department lookup, pending submission,
    /// success banner
    pub fn tick(&mut self, now: Instant) {
        if let Some(rx) = self.departments.as_mut() {
            match rx.try_recv() {
                Ok(options) => {
                    self.departments = None;
                    if !options.is_empty() {
                        self.replace_config(apply_departments(&self.config, options));
                    }
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    error!("department lookup ended without a result");
                    self.departments = None;
                }
            }
        }

        if let Some(values) = self.form.poll(&self.config, now) {
            let id = self.records.push(values).id;
            self.form_focus = 0;
            self.status_message = format!("Registro {} guardado", id);
        }
    }

    /// Swap in a new schema and keep dependent state consistent
    fn replace_config(&mut self, config: FormConfig) {
        self.config = config;
        self.form.sync_with(&self.config);
        self.form_focus = self.form_focus.min(self.config.fields.len());
        self.config_selected = self
            .config_selected
            .min(self.config.fields.len().saturating_sub(1));
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(size);

        super::panes::render_tabs(frame, chunks[0], self.view, self.records.len());

        let now = Instant::now();
        match self.view {
            View::Form => super::panes::render_form_pane(
                frame,
                chunks[1],
                &self.config,
                &self.form,
                self.form_focus,
                now,
            ),
            View::Records => {
                let filtered = search(self.records.records(), &self.search_term);
                super::panes::render_records_pane(
                    frame,
                    chunks[1],
                    &self.config,
                    self.records.records(),
                    &filtered,
                    &self.search_term,
                    self.records_layout,
                    &mut self.records_scroll,
                );
            }
            View::Config => {
                super::panes::render_config_pane(
                    frame,
                    chunks[1],
                    &self.config,
                    self.config_selected,
                );
                if let Some(dialog) = &self.dialog {
                    super::panes::render_add_field_dialog(frame, size, dialog);
                }
            }
        }

        super::panes::render_status_bar(
            frame,
            chunks[2],
            &self.status_message,
            self.view,
            self.dialog.is_some(),
            self.form.is_submitting(),
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.dialog.is_some() {
            self.handle_dialog_key(key);
            return;
        }

        match key.code {
            KeyCode::Esc if self.view == View::Records => {
                self.search_term.clear();
                self.records_scroll = 0;
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.view = self.view.next(),
            KeyCode::BackTab => self.view = self.view.prev(),
            _ => match self.view {
                View::Form => self.handle_form_key(key, now),
                View::Records => self.handle_records_key(key, ctrl),
                View::Config => self.handle_config_key(key),
            },
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent, now: Instant) {
        let field_count = self.config.fields.len();
        let focused = self.config.fields.get(self.form_focus).cloned();

        match key.code {
            KeyCode::Up => self.form_focus = self.form_focus.saturating_sub(1),
            KeyCode::Down => self.form_focus = (self.form_focus + 1).min(field_count),
            KeyCode::Enter => match focused {
                Some(_) => self.form_focus = (self.form_focus + 1).min(field_count),
                None => self.submit(now),
            },
            KeyCode::Left | KeyCode::Right => {
                if let Some(field) = focused.filter(|f| f.field_type == FieldType::Select) {
                    self.form.cycle_option(&field, key.code == KeyCode::Right);
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = focused.filter(|f| f.field_type != FieldType::Select) {
                    self.form.pop_char(&field);
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = focused.filter(|f| f.field_type != FieldType::Select) {
                    self.form.push_char(&field, c);
                }
            }
            _ => {}
        }
    }

    fn submit(&mut self, now: Instant) {
        match self.form.begin_submit(&self.config, now) {
            SubmitOutcome::Accepted => self.status_message = "Enviando...".to_string(),
            SubmitOutcome::Invalid(count) => {
                self.status_message = format!("{} campo(s) con errores", count);
                if let Some(pos) = self
                    .config
                    .fields
                    .iter()
                    .position(|f| self.form.error(&f.id).is_some())
                {
                    self.form_focus = pos;
                }
            }
            SubmitOutcome::Busy => {}
        }
    }

    fn handle_records_key(&mut self, key: KeyEvent, ctrl: bool) {
        match key.code {
            KeyCode::Char('e') if ctrl => self.export(),
            KeyCode::Char('l') if ctrl => {
                self.records_layout = match self.records_layout {
                    RecordsLayout::Cards => RecordsLayout::Table,
                    RecordsLayout::Table => RecordsLayout::Cards,
                };
            }
            KeyCode::Up => self.records_scroll = self.records_scroll.saturating_sub(1),
            KeyCode::Down => self.records_scroll = self.records_scroll.saturating_add(1),
            KeyCode::Backspace => {
                self.search_term.pop();
                self.records_scroll = 0;
            }
            KeyCode::Char(c) if !ctrl => {
                self.search_term.push(c);
                self.records_scroll = 0;
            }
            _ => {}
        }
    }

    /// Export every record, regardless of the active search
    pub fn export(&mut self) {
        let Some(csv) = export_csv(&self.config, self.records.records()) else {
            self.status_message = "No hay registros para exportar".to_string();
            return;
        };
        match write_export(&self.export_dir, &csv) {
            Ok(path) => self.status_message = format!("Exportado a {}", path.display()),
            Err(e) => {
                error!("export failed: {}", e);
                self.status_message = format!("Error al exportar: {}", e);
            }
        }
    }

    fn handle_config_key(&mut self, key: KeyEvent) {
        let Some(field) = self.config.fields.get(self.config_selected).cloned() else {
            if key.code == KeyCode::Char('a') {
                self.dialog = Some(AddFieldDialog::default());
            }
            return;
        };

        match key.code {
            KeyCode::Up => self.config_selected = self.config_selected.saturating_sub(1),
            KeyCode::Down => {
                self.config_selected =
                    (self.config_selected + 1).min(self.config.fields.len().saturating_sub(1))
            }
            KeyCode::Char('a') => self.dialog = Some(AddFieldDialog::default()),
            KeyCode::Char(' ') => {
                let property = FieldProperty::Required(!field.required);
                if !is_locked(&field.id, &property) {
                    let updated = update_field_property(&self.config, &field.id, property);
                    self.replace_config(updated);
                }
            }
            KeyCode::Char(c @ ('+' | '-')) => {
                let current = field.min_length.unwrap_or(0);
                let next = if c == '+' {
                    current.saturating_add(1)
                } else {
                    current.saturating_sub(1)
                };
                let property = FieldProperty::MinLength(Some(next).filter(|n| *n > 0));
                if field.field_type.supports_min_length() && !is_locked(&field.id, &property) {
                    let updated = update_field_property(&self.config, &field.id, property);
                    self.replace_config(updated);
                }
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                let updated = remove_field(&self.config, &field.id);
                if updated.fields.len() != self.config.fields.len() {
                    self.status_message = format!("Campo {} eliminado", field.id);
                }
                self.replace_config(updated);
            }
            _ => {}
        }
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Esc => {
                self.dialog = None;
                return;
            }
            KeyCode::Tab | KeyCode::Down => {
                dialog.move_focus(true);
                return;
            }
            KeyCode::BackTab | KeyCode::Up => {
                dialog.move_focus(false);
                return;
            }
            _ => {}
        }

        match (dialog.focus(), key.code) {
            (DialogFocus::Id, KeyCode::Char(c)) => {
                dialog.draft.id.push(c);
                dialog.errors.id = None;
            }
            (DialogFocus::Id, KeyCode::Backspace) => {
                dialog.draft.id.pop();
            }
            (DialogFocus::Label, KeyCode::Char(c)) => {
                dialog.draft.label.push(c);
                dialog.errors.label = None;
            }
            (DialogFocus::Label, KeyCode::Backspace) => {
                dialog.draft.label.pop();
            }
            (DialogFocus::Type, KeyCode::Left) => {
                dialog.draft.field_type = dialog.draft.field_type.prev();
            }
            (DialogFocus::Type, KeyCode::Right) => {
                dialog.draft.field_type = dialog.draft.field_type.next();
            }
            (DialogFocus::Required, KeyCode::Char(' ')) => {
                dialog.draft.required = !dialog.draft.required;
            }
            (DialogFocus::MinLength, KeyCode::Char(c)) if c.is_ascii_digit() => {
                let digit = c.to_digit(10).unwrap_or(0);
                dialog.draft.min_length = dialog
                    .draft
                    .min_length
                    .saturating_mul(10)
                    .saturating_add(digit);
            }
            (DialogFocus::MinLength, KeyCode::Backspace) => {
                dialog.draft.min_length /= 10;
            }
            (DialogFocus::OptionValue, KeyCode::Char(c)) => dialog.option_value.push(c),
            (DialogFocus::OptionValue, KeyCode::Backspace) => {
                dialog.option_value.pop();
            }
            (DialogFocus::OptionLabel, KeyCode::Char(c)) => dialog.option_label.push(c),
            (DialogFocus::OptionLabel, KeyCode::Backspace) => {
                dialog.option_label.pop();
            }
            (DialogFocus::OptionValue | DialogFocus::OptionLabel, KeyCode::Enter) => {
                dialog.add_pending_option();
            }
            (DialogFocus::Options, KeyCode::Left) => {
                dialog.option_selected = dialog.option_selected.saturating_sub(1);
            }
            (DialogFocus::Options, KeyCode::Right) => {
                dialog.option_selected = (dialog.option_selected + 1)
                    .min(dialog.draft.options.len().saturating_sub(1));
            }
            (DialogFocus::Options, KeyCode::Delete | KeyCode::Backspace) => {
                dialog.draft.remove_option(dialog.option_selected);
                dialog.option_selected = dialog
                    .option_selected
                    .min(dialog.draft.options.len().saturating_sub(1));
            }
            (DialogFocus::Confirm, KeyCode::Enter) => self.confirm_dialog(),
            _ => {}
        }
    }

    fn confirm_dialog(&mut self) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        match add_new_field(&self.config, &mut dialog.draft) {
            Ok(updated) => {
                self.dialog = None;
                self.replace_config(updated);
                if let Some(field) = self.config.fields.last() {
                    info!(field = %field.id, "field added from editor");
                    self.status_message = format!("Campo {} agregado", field.id);
                }
                self.config_selected = self.config.fields.len().saturating_sub(1);
            }
            Err(errors) => {
                dialog.focus_index = if errors.id.is_some() { 0 } else { 1 };
                dialog.errors = errors;
            }
        }
    }
}
