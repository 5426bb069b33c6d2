// Integration tests driving the TUI application through key events

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};
use registro::form::SUBMIT_DELAY;
use registro::schema::{default_config, SelectOption, DEPARTMENT_FIELD_ID};
use registro::ui::app::{App, DialogFocus, RecordsLayout, View};
use std::time::Instant;
use tempfile::tempdir;
use tokio::sync::oneshot;

fn press(app: &mut App, code: KeyCode, now: Instant) {
    app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), now);
}

fn type_text(app: &mut App, text: &str, now: Instant) {
    for c in text.chars() {
        press(app, KeyCode::Char(c), now);
    }
}

fn screen_text(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 50)).unwrap();
    terminal.draw(|f| app.render(f)).unwrap();
    let buffer = terminal.backend().buffer().clone();
    buffer
        .content()
        .chunks(buffer.area.width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn new_app() -> App {
    App::new(default_config(), std::env::temp_dir())
}

/// Fill the default form with valid values and press submit
fn submit_employee(app: &mut App, name: &str, now: Instant) {
    app.view = View::Form;
    app.form_focus = 0;
    type_text(app, name, now);
    press(app, KeyCode::Down, now);
    type_text(app, "Pérez", now);
    press(app, KeyCode::Down, now);
    press(app, KeyCode::Down, now);
    press(app, KeyCode::Right, now); // genero -> masculino
    press(app, KeyCode::Down, now);
    press(app, KeyCode::Down, now); // submit button
    press(app, KeyCode::Enter, now);
}

#[test]
fn test_tab_cycles_views() {
    let mut app = new_app();
    let now = Instant::now();
    assert_eq!(app.view, View::Form);
    press(&mut app, KeyCode::Tab, now);
    assert_eq!(app.view, View::Records);
    press(&mut app, KeyCode::Tab, now);
    assert_eq!(app.view, View::Config);
    press(&mut app, KeyCode::BackTab, now);
    assert_eq!(app.view, View::Records);
}

#[test]
fn test_submit_creates_record_after_delay() {
    let mut app = new_app();
    let t0 = Instant::now();
    submit_employee(&mut app, "Ana", t0);
    assert!(app.form.is_submitting());
    assert!(app.records.is_empty());

    app.tick(t0 + SUBMIT_DELAY);
    assert_eq!(app.records.len(), 1);
    let record = &app.records.records()[0];
    assert_eq!(record.get("nombres"), Some("Ana"));
    assert_eq!(record.get("genero"), Some("masculino"));
    assert_eq!(app.form.value("nombres"), "");
}

#[test]
fn test_invalid_submit_focuses_first_error() {
    let mut app = new_app();
    let now = Instant::now();
    app.form_focus = app.config.fields.len();
    press(&mut app, KeyCode::Enter, now);
    assert!(!app.form.is_submitting());
    assert_eq!(app.form_focus, 0);
    assert!(screen_text(&mut app).contains("Nombres es obligatorio"));
}

#[test]
fn test_departments_arrive_through_channel() {
    let (tx, rx) = oneshot::channel();
    let mut app = new_app().with_departments(rx);
    app.tick(Instant::now());
    assert!(app.config.field(DEPARTMENT_FIELD_ID).unwrap().options.is_empty());

    tx.send(vec![SelectOption::new("1", "San Salvador")]).unwrap();
    app.tick(Instant::now());
    let field = app.config.field(DEPARTMENT_FIELD_ID).unwrap();
    assert_eq!(field.option_label("1"), Some("San Salvador"));
}

#[test]
fn test_failed_lookup_keeps_loading_placeholder() {
    let (tx, rx) = oneshot::channel::<Vec<SelectOption>>();
    let mut app = new_app().with_departments(rx);
    drop(tx);
    app.tick(Instant::now());
    assert!(app.config.field(DEPARTMENT_FIELD_ID).unwrap().options.is_empty());
    assert!(screen_text(&mut app).contains("Cargando..."));
}

#[test]
fn test_records_search_and_layout_toggle() {
    let mut app = new_app();
    let t0 = Instant::now();
    submit_employee(&mut app, "Ana", t0);
    app.tick(t0 + SUBMIT_DELAY);
    submit_employee(&mut app, "Luis", t0 + SUBMIT_DELAY);
    app.tick(t0 + SUBMIT_DELAY * 2);
    assert_eq!(app.records.len(), 2);

    app.view = View::Records;
    type_text(&mut app, "lui", t0);
    assert_eq!(app.search_term, "lui");
    let screen = screen_text(&mut app);
    assert!(screen.contains("Mostrando 1 de 2 registros"));
    assert!(screen.contains("Registros (2)"));

    app.handle_key_event(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL), t0);
    assert_eq!(app.records_layout, RecordsLayout::Cards);
}

#[test]
fn test_export_without_records_reports_status() {
    let mut app = new_app();
    app.export();
    assert_eq!(app.status_message, "No hay registros para exportar");
}

#[test]
fn test_export_writes_all_records_despite_search() {
    let dir = tempdir().unwrap();
    let mut app = App::new(default_config(), dir.path().to_path_buf());
    let t0 = Instant::now();
    submit_employee(&mut app, "Ana", t0);
    app.tick(t0 + SUBMIT_DELAY);
    submit_employee(&mut app, "Luis", t0 + SUBMIT_DELAY);
    app.tick(t0 + SUBMIT_DELAY * 2);

    app.view = View::Records;
    type_text(&mut app, "zzz", t0);
    app.handle_key_event(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL), t0);

    let csv = std::fs::read_to_string(dir.path().join("empleados.csv")).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("\"Ana\""));
    assert!(csv.contains("\"Luis\""));
}

#[test]
fn test_config_cannot_delete_or_unrequire_default_field() {
    let mut app = new_app();
    let now = Instant::now();
    app.view = View::Config;
    let before = app.config.clone();

    press(&mut app, KeyCode::Char('d'), now);
    press(&mut app, KeyCode::Char(' '), now);
    press(&mut app, KeyCode::Char('+'), now);
    assert_eq!(app.config, before);
}

#[test]
fn test_add_field_dialog_flow() {
    let mut app = new_app();
    let now = Instant::now();
    app.view = View::Config;
    press(&mut app, KeyCode::Char('a'), now);
    assert!(app.dialog.is_some());

    // confirm immediately: both errors, dialog stays open
    while app.dialog.as_ref().unwrap().focus() != DialogFocus::Confirm {
        press(&mut app, KeyCode::Down, now);
    }
    press(&mut app, KeyCode::Enter, now);
    let dialog = app.dialog.as_ref().expect("dialog closed on invalid draft");
    assert!(dialog.errors.id.is_some());
    assert!(dialog.errors.label.is_some());
    assert_eq!(dialog.focus(), DialogFocus::Id);

    type_text(&mut app, "Telefono Movil", now);
    press(&mut app, KeyCode::Down, now);
    type_text(&mut app, "Teléfono", now);
    press(&mut app, KeyCode::Down, now);
    press(&mut app, KeyCode::Right, now); // text -> email
    press(&mut app, KeyCode::Right, now); // email -> tel
    while app.dialog.as_ref().unwrap().focus() != DialogFocus::Confirm {
        press(&mut app, KeyCode::Down, now);
    }
    press(&mut app, KeyCode::Enter, now);

    assert!(app.dialog.is_none());
    let field = app.config.field("telefono_movil").expect("field not added");
    assert_eq!(field.label, "Teléfono");
    assert_eq!(app.form.value("telefono_movil"), "");

    // custom fields can be removed
    press(&mut app, KeyCode::Char('d'), now);
    assert!(!app.config.contains("telefono_movil"));
}

#[test]
fn test_esc_clears_search_instead_of_quitting() {
    let mut app = new_app();
    let now = Instant::now();
    app.view = View::Records;
    type_text(&mut app, "ana", now);

    press(&mut app, KeyCode::Esc, now);
    assert_eq!(app.search_term, "");
    assert!(!app.should_quit);

    press(&mut app, KeyCode::Esc, now);
    assert!(!app.should_quit);

    app.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), now);
    assert!(app.should_quit);
}
