use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::{components::centered, theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let rect = centered(30, 3, area);
    let lines = vec![
        Line::from(Span::styled(
            "My Budget",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "loading…",
            Style::default().fg(theme.text_muted),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
}
