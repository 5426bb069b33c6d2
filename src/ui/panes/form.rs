//! Entry form rendering

use crate::form::{FormState, SUCCESS_MESSAGE};
use crate::schema::{Field, FieldType, FormConfig};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::time::Instant;

const TEL_HINT: &str = "Formato: 8 dígitos numéricos";

/// Rows a field occupies: bordered input plus one line for error or hint
fn field_height(field: &Field) -> u16 {
    let input = if field.field_type == FieldType::Textarea { 5 } else { 3 };
    input + 1
}

/// First field to draw so that `focus` stays visible
fn first_visible(fields: &[Field], focus: usize, available: u16) -> usize {
    let focus = focus.min(fields.len().saturating_sub(1));
    let mut start = focus;
    let mut used = fields.get(focus).map(field_height).unwrap_or(0);
    while start > 0 {
        let h = field_height(&fields[start - 1]);
        if used + h > available {
            break;
        }
        used += h;
        start -= 1;
    }
    start
}

fn placeholder(field: &Field) -> String {
    match field.field_type {
        FieldType::Tel => "12345678".to_string(),
        FieldType::Select if field.options.is_empty() => "Cargando...".to_string(),
        FieldType::Select => format!("Seleccione {}", field.label.to_lowercase()),
        _ => format!("Ingrese {}", field.label.to_lowercase()),
    }
}

fn render_field(frame: &mut Frame, area: Rect, field: &Field, form: &FormState, focused: bool) {
    let error = form.error(&field.id);

    let border_style = if error.is_some() {
        Style::default().fg(DEFAULT_THEME.error)
    } else if focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let mut title = vec![Span::raw(format!(" {}", field.label))];
    if field.required {
        title.push(Span::styled("*", Style::default().fg(DEFAULT_THEME.error)));
    }
    title.push(Span::raw(" "));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(border_style);

    let raw = form.value(&field.id);
    let content = if field.field_type == FieldType::Select {
        match field.option_label(raw) {
            Some(label) => Line::from(vec![
                Span::styled("◂ ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(label.to_string(), Style::default().fg(DEFAULT_THEME.fg)),
                Span::styled(" ▸", Style::default().fg(DEFAULT_THEME.comment)),
            ]),
            None => Line::from(Span::styled(
                placeholder(field),
                Style::default().fg(DEFAULT_THEME.comment),
            )),
        }
    } else if raw.is_empty() {
        Line::from(Span::styled(
            placeholder(field),
            Style::default().fg(DEFAULT_THEME.comment),
        ))
    } else {
        let mut spans = vec![Span::styled(raw.to_string(), Style::default().fg(DEFAULT_THEME.fg))];
        if focused {
            spans.push(Span::styled("▏", Style::default().fg(DEFAULT_THEME.border_focused)));
        }
        Line::from(spans)
    };

    let input = Paragraph::new(content).block(block).wrap(Wrap { trim: false });
    frame.render_widget(input, chunks[0]);

    let below = match error {
        Some(err) => Paragraph::new(err.to_string()).style(Style::default().fg(DEFAULT_THEME.error)),
        None if field.field_type == FieldType::Tel => {
            Paragraph::new(TEL_HINT).style(Style::default().fg(DEFAULT_THEME.comment))
        }
        None => Paragraph::new(""),
    };
    frame.render_widget(below, chunks[1]);
}

/// Render the entry form: success banner, one input per field, submit button
pub fn render_form_pane(
    frame: &mut Frame,
    area: Rect,
    config: &FormConfig,
    form: &FormState,
    focus: usize,
    now: Instant,
) {
    let outer = Block::default()
        .title(" Registro de Empleado ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let banner_height = if form.show_success(now) { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    if banner_height > 0 {
        let banner = Paragraph::new(format!("✔ {}", SUCCESS_MESSAGE)).style(
            Style::default()
                .fg(DEFAULT_THEME.success)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(banner, chunks[0]);
    }

    let fields_area = chunks[1];
    if config.fields.is_empty() {
        frame.render_widget(
            Paragraph::new("(sin campos)").style(Style::default().fg(DEFAULT_THEME.comment)),
            fields_area,
        );
    } else {
        let start = first_visible(&config.fields, focus, fields_area.height);
        let mut y = fields_area.y;
        let bottom = fields_area.y + fields_area.height;
        for (idx, field) in config.fields.iter().enumerate().skip(start) {
            let h = field_height(field);
            if y + h > bottom {
                break;
            }
            let rect = Rect::new(fields_area.x, y, fields_area.width, h);
            render_field(frame, rect, field, form, idx == focus);
            y += h;
        }
    }

    let submit_focused = focus >= config.fields.len();
    let (label, style) = if form.is_submitting() {
        (
            " Enviando... ",
            Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black),
        )
    } else if submit_focused {
        (
            " Registrar Empleado ",
            Style::default()
                .bg(DEFAULT_THEME.primary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            " Registrar Empleado ",
            Style::default().bg(DEFAULT_THEME.current_line_bg).fg(DEFAULT_THEME.fg),
        )
    };
    let button = Paragraph::new(Line::from(Span::styled(label, style))).alignment(Alignment::Right);
    frame.render_widget(button, chunks[2]);
}
