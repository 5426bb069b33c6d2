//! Records viewer rendering: search box, table or cards, counter

use crate::records::{cell_text, derive_fields, field_label, Record};
use crate::schema::FormConfig;
use crate::ui::app::RecordsLayout;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table},
    Frame,
};

/// Render the records view.
///
/// `filtered` is the subset matching `search_term`; columns are always
/// derived from the full record list so they do not jump while typing.
#[allow(clippy::too_many_arguments)]
pub fn render_records_pane(
    frame: &mut Frame,
    area: Rect,
    config: &FormConfig,
    records: &[Record],
    filtered: &[&Record],
    search_term: &str,
    layout: RecordsLayout,
    scroll_offset: &mut usize,
) {
    let outer = Block::default()
        .title(" Registros de Empleados ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    if records.is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No hay registros aún",
                Style::default().fg(DEFAULT_THEME.fg).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Los empleados registrados aparecerán aquí",
                Style::default().fg(DEFAULT_THEME.comment),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center),
            inner,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    let search_line = if search_term.is_empty() {
        Span::styled("Buscar empleados...", Style::default().fg(DEFAULT_THEME.comment))
    } else {
        Span::styled(search_term.to_string(), Style::default().fg(DEFAULT_THEME.fg))
    };
    let search_box = Paragraph::new(Line::from(vec![Span::raw("⌕ "), search_line])).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(DEFAULT_THEME.border_focused)),
    );
    frame.render_widget(search_box, chunks[0]);

    let fields = derive_fields(records);
    match layout {
        RecordsLayout::Table => {
            render_table(frame, chunks[1], config, filtered, &fields, scroll_offset)
        }
        RecordsLayout::Cards => {
            render_cards(frame, chunks[1], config, filtered, &fields, scroll_offset)
        }
    }

    let counter = Paragraph::new(format!(
        "Mostrando {} de {} registros",
        filtered.len(),
        records.len()
    ))
    .style(Style::default().fg(DEFAULT_THEME.comment));
    frame.render_widget(counter, chunks[2]);
}

fn clamp_scroll(scroll_offset: &mut usize, total: usize, visible: usize) {
    if total > visible {
        *scroll_offset = (*scroll_offset).min(total - visible);
    } else {
        *scroll_offset = 0;
    }
}

fn render_table(
    frame: &mut Frame,
    area: Rect,
    config: &FormConfig,
    filtered: &[&Record],
    fields: &[String],
    scroll_offset: &mut usize,
) {
    let header_style = Style::default()
        .fg(DEFAULT_THEME.comment)
        .add_modifier(Modifier::BOLD);
    let mut header: Vec<Cell> = vec![Cell::from("#")];
    header.extend(fields.iter().map(|id| Cell::from(field_label(config, id))));
    header.push(Cell::from("Fecha de Registro"));

    // Header plus its bottom margin
    let visible = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, filtered.len(), visible);

    let rows: Vec<Row> = filtered
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible)
        .map(|(index, record)| {
            let mut cells = vec![Cell::from(Span::styled(
                format!(" {} ", index + 1),
                Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black),
            ))];
            cells.extend(
                fields
                    .iter()
                    .map(|id| Cell::from(cell_text(config, record, id))),
            );
            cells.push(Cell::from(Span::styled(
                record.timestamp.clone(),
                Style::default().fg(DEFAULT_THEME.comment),
            )));
            Row::new(cells).style(Style::default().fg(DEFAULT_THEME.fg))
        })
        .collect();

    let mut widths = vec![Constraint::Length(5)];
    widths.extend(fields.iter().map(|_| Constraint::Min(10)));
    widths.push(Constraint::Length(22));

    let table = Table::new(rows, widths)
        .header(Row::new(header).style(header_style).bottom_margin(1))
        .column_spacing(2);
    frame.render_widget(table, area);
}

fn render_cards(
    frame: &mut Frame,
    area: Rect,
    config: &FormConfig,
    filtered: &[&Record],
    fields: &[String],
    scroll_offset: &mut usize,
) {
    // One header line, one line per field, one blank separator
    let card_height = fields.len() + 2;
    let visible = (area.height as usize / card_height.max(1)).max(1);
    clamp_scroll(scroll_offset, filtered.len(), visible);

    let items: Vec<ListItem> = filtered
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible)
        .map(|(index, record)| {
            let mut lines = vec![Line::from(vec![
                Span::styled(
                    format!(" #{} ", index + 1),
                    Style::default()
                        .bg(DEFAULT_THEME.comment)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    record.timestamp.clone(),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
            ])];
            for id in fields {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {}: ", field_label(config, id)),
                        Style::default().fg(DEFAULT_THEME.comment),
                    ),
                    Span::styled(cell_text(config, record, id), Style::default().fg(DEFAULT_THEME.fg)),
                ]));
            }
            lines.push(Line::from(""));
            ListItem::new(lines)
        })
        .collect();

    frame.render_widget(List::new(items), area);
}
