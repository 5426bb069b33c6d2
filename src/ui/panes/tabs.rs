//! Title and tab bar

use crate::ui::app::View;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

const APP_TITLE: &str = " Restaurante Lorem Ipsum ";

fn tab_title(view: View, record_count: usize) -> String {
    match view {
        View::Form => "Formulario".to_string(),
        View::Records => format!("Registros ({})", record_count),
        View::Config => "Configuración".to_string(),
    }
}

pub fn render_tabs(frame: &mut Frame, area: Rect, active: View, record_count: usize) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .map(|view| Line::from(tab_title(*view, record_count)))
        .collect();

    let tabs = Tabs::new(titles)
        .select(active.index())
        .block(
            Block::default()
                .title(APP_TITLE)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(DEFAULT_THEME.border_normal)),
        )
        .style(Style::default().fg(DEFAULT_THEME.comment))
        .highlight_style(
            Style::default()
                .fg(DEFAULT_THEME.primary)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(" │ ");

    frame.render_widget(tabs, area);
}
