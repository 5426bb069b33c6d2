//! Status bar rendering with keybindings for the active view

use crate::ui::app::View;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Key/description pairs shown on the right for the current context
fn keybinds(view: View, dialog_open: bool) -> &'static [(&'static str, &'static str)] {
    if dialog_open {
        return &[
            ("↑/↓", "campo"),
            ("←/→", "tipo/opción"),
            ("⎵", "marcar"),
            ("↵", "agregar"),
            ("Esc", "cancelar"),
        ];
    }
    match view {
        View::Form => &[
            ("⇥", "vista"),
            ("↑/↓", "campo"),
            ("←/→", "opción"),
            ("↵", "siguiente/enviar"),
            ("Esc", "salir"),
        ],
        View::Records => &[
            ("⇥", "vista"),
            ("^E", "exportar CSV"),
            ("^L", "tabla/tarjetas"),
            ("↑/↓", "desplazar"),
            ("Esc", "limpiar búsqueda"),
            ("^C", "salir"),
        ],
        View::Config => &[
            ("⇥", "vista"),
            ("a", "agregar"),
            ("⎵", "obligatorio"),
            ("+/-", "longitud"),
            ("d", "eliminar"),
            ("Esc", "salir"),
        ],
    }
}

/// Render the status bar at the bottom
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    view: View,
    dialog_open: bool,
    is_submitting: bool,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let bar_style = Style::default().bg(DEFAULT_THEME.current_line_bg);
    let left_spans = vec![
        Span::styled(
            if is_submitting { " ENVIANDO " } else { " LISTO " },
            Style::default()
                .bg(if is_submitting {
                    DEFAULT_THEME.secondary
                } else {
                    DEFAULT_THEME.primary
                })
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {} ", message), bar_style.fg(DEFAULT_THEME.fg)),
    ];
    frame.render_widget(
        Paragraph::new(Line::from(left_spans))
            .style(bar_style)
            .alignment(Alignment::Left),
        layout[0],
    );

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = bar_style.fg(DEFAULT_THEME.fg);
    let sep_style = bar_style.fg(DEFAULT_THEME.comment);

    let mut right_spans = Vec::new();
    for (i, (key, desc)) in keybinds(view, dialog_open).iter().enumerate() {
        if i > 0 {
            right_spans.push(Span::styled("│", sep_style));
        }
        right_spans.push(Span::styled(format!(" {} ", key), key_style));
        right_spans.push(Span::styled(format!(" {} ", desc), desc_style));
    }
    frame.render_widget(
        Paragraph::new(Line::from(right_spans))
            .style(bar_style)
            .alignment(Alignment::Right),
        layout[1],
    );
}
