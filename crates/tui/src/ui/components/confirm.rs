use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{app::PendingDelete, ui::components::centered, ui::theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, pending: Option<&PendingDelete>, theme: &Theme) {
    let Some(pending) = pending else {
        return;
    };

    let rect = centered(50, 7, area);
    let block = Block::default()
        .title(Span::styled(
            " Delete Expense ",
            Style::default()
                .fg(theme.error)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.error))
        .style(Style::default().bg(theme.surface));

    let lines = vec![
        Line::from(Span::styled(
            "Are you sure you want to delete this expense?",
            Style::default().fg(theme.text),
        )),
        Line::from(Span::styled(
            pending.title.as_str(),
            Style::default().fg(theme.text_muted),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled("n", Style::default().fg(theme.accent)),
            Span::raw(" Cancel    "),
            Span::styled("y", Style::default().fg(theme.error)),
            Span::raw(" Delete"),
        ]),
    ];

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        rect,
    );
}
