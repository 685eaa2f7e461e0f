use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::{app::Alert, ui::components::centered, ui::theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, alert: Option<&Alert>, theme: &Theme) {
    let Some(alert) = alert else {
        return;
    };

    let width = (alert.message.chars().count().min(54) as u16 + 6).max(30);
    let rect = centered(width, 6, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.error))
        .style(Style::default().bg(theme.surface));
    let lines = vec![
        Line::from(Span::styled(
            alert.message.as_str(),
            Style::default().fg(theme.text),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(theme.accent)),
            Span::styled(" OK", Style::default().fg(theme.text_muted)),
        ]),
    ];

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        rect,
    );
}
