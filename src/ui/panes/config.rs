//! Schema editor rendering: field list and the add-field dialog

use crate::schema::editor::{is_locked, FieldProperty};
use crate::schema::{is_default_field, FieldType, FormConfig};
use crate::ui::app::{AddFieldDialog, DialogFocus};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

fn badge(text: &str, bg: Color) -> Span<'static> {
    Span::styled(
        format!(" {} ", text),
        Style::default().bg(bg).fg(Color::Black),
    )
}

/// Render the list of field definitions with their editable settings
pub fn render_config_pane(frame: &mut Frame, area: Rect, config: &FormConfig, selected: usize) {
    let outer = Block::default()
        .title(" Panel de Configuración ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let intro = Paragraph::new(vec![
        Line::from(Span::styled(
            "Configuración de Campos",
            Style::default().fg(DEFAULT_THEME.fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Modifica el comportamiento de cada campo del formulario. Los campos por defecto no se pueden eliminar.",
            Style::default().fg(DEFAULT_THEME.comment),
        )),
    ]);
    frame.render_widget(intro, chunks[0]);

    let items: Vec<ListItem> = config
        .fields
        .iter()
        .map(|field| {
            let default = is_default_field(&field.id);

            let mut title = vec![Span::styled(
                field.label.clone(),
                Style::default().fg(DEFAULT_THEME.fg).add_modifier(Modifier::BOLD),
            )];
            title.push(Span::raw(" "));
            title.push(badge(field.field_type.as_str(), DEFAULT_THEME.badge));
            if field.required {
                title.push(Span::raw(" "));
                title.push(badge("Obligatorio", DEFAULT_THEME.error));
            }
            if default {
                title.push(Span::raw(" "));
                title.push(badge("Campo por defecto", DEFAULT_THEME.comment));
            }

            let lock_style = if is_locked(&field.id, &FieldProperty::Required(field.required)) {
                Style::default().fg(DEFAULT_THEME.comment).add_modifier(Modifier::DIM)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };
            let mut details = vec![
                Span::raw("  "),
                Span::styled(
                    format!(
                        "[{}] Campo obligatorio",
                        if field.required { "x" } else { " " }
                    ),
                    lock_style,
                ),
            ];
            if field.field_type.supports_min_length() {
                details.push(Span::styled(
                    format!("   Longitud mínima: {}", field.min_length.unwrap_or(0)),
                    lock_style,
                ));
            }
            if field.field_type == FieldType::Select {
                details.push(Span::styled(
                    format!("   Opciones: {}", field.options.len()),
                    Style::default().fg(DEFAULT_THEME.comment),
                ));
            }

            let id_line = Line::from(vec![
                Span::styled("  ID: ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(field.id.clone(), Style::default().fg(DEFAULT_THEME.secondary)),
            ]);

            ListItem::new(vec![Line::from(title), Line::from(details), id_line, Line::from("")])
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .highlight_symbol("▶ ");
    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

/// A rectangle of the given size centered in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn input_line<'a>(
    label: &'a str,
    value: String,
    placeholder: &'a str,
    focused: bool,
) -> Line<'a> {
    let label_style = if focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.comment)
    };
    let value_span = if value.is_empty() {
        Span::styled(placeholder, Style::default().fg(DEFAULT_THEME.border_normal))
    } else {
        Span::styled(value, Style::default().fg(DEFAULT_THEME.fg))
    };
    Line::from(vec![Span::styled(format!("{:<18}", label), label_style), value_span])
}

fn error_line(message: Option<&String>) -> Option<Line<'static>> {
    message.map(|m| {
        Line::from(Span::styled(
            format!("{:<18}{}", "", m),
            Style::default().fg(DEFAULT_THEME.error),
        ))
    })
}

/// Render the add-field dialog over everything else
pub fn render_add_field_dialog(frame: &mut Frame, area: Rect, dialog: &AddFieldDialog) {
    let focus = dialog.focus();
    let draft = &dialog.draft;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(input_line(
        "ID del Campo",
        draft.id.clone(),
        "ej: fecha_nacimiento",
        focus == DialogFocus::Id,
    ));
    lines.extend(error_line(dialog.errors.id.as_ref()));

    lines.push(input_line(
        "Etiqueta",
        draft.label.clone(),
        "ej: Fecha de Nacimiento",
        focus == DialogFocus::Label,
    ));
    lines.extend(error_line(dialog.errors.label.as_ref()));

    lines.push(input_line(
        "Tipo de Campo",
        format!("◂ {} ▸", draft.field_type.display_name()),
        "",
        focus == DialogFocus::Type,
    ));

    if draft.field_type == FieldType::Select {
        lines.push(input_line(
            "Opción: valor",
            dialog.option_value.clone(),
            "Valor",
            focus == DialogFocus::OptionValue,
        ));
        lines.push(input_line(
            "Opción: etiqueta",
            dialog.option_label.clone(),
            "Etiqueta (Enter para agregar)",
            focus == DialogFocus::OptionLabel,
        ));

        let options_focused = focus == DialogFocus::Options;
        let mut spans = vec![Span::styled(
            format!("{:<18}", "Opciones agregadas"),
            if options_focused {
                Style::default()
                    .fg(DEFAULT_THEME.border_focused)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            },
        )];
        if draft.options.is_empty() {
            spans.push(Span::styled("(ninguna)", Style::default().fg(DEFAULT_THEME.border_normal)));
        }
        for (i, option) in draft.options.iter().enumerate() {
            let style = if options_focused && i == dialog.option_selected {
                Style::default().bg(DEFAULT_THEME.current_line_bg).fg(DEFAULT_THEME.fg)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };
            spans.push(Span::styled(format!("{} ({})", option.label, option.value), style));
            spans.push(Span::raw("  "));
        }
        lines.push(Line::from(spans));
    }

    lines.push(input_line(
        "Campo obligatorio",
        format!("[{}]", if draft.required { "x" } else { " " }),
        "",
        focus == DialogFocus::Required,
    ));

    if draft.field_type.supports_min_length() {
        lines.push(input_line(
            "Longitud mínima",
            draft.min_length.to_string(),
            "0",
            focus == DialogFocus::MinLength,
        ));
    }

    lines.push(Line::from(""));
    let confirm_style = if focus == DialogFocus::Confirm {
        Style::default()
            .bg(DEFAULT_THEME.primary)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(DEFAULT_THEME.current_line_bg).fg(DEFAULT_THEME.fg)
    };
    lines.push(Line::from(vec![
        Span::styled(" Esc ", Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black)),
        Span::raw(" Cancelar   "),
        Span::styled(" Agregar Campo ", confirm_style),
    ]));

    let height = lines.len() as u16 + 2;
    let rect = centered(area, 72, height);
    frame.render_widget(Clear, rect);
    let dialog_widget = Paragraph::new(lines).block(
        Block::default()
            .title(" Agregar Nuevo Campo ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(DEFAULT_THEME.border_focused)),
    );
    frame.render_widget(dialog_widget, rect);
}
