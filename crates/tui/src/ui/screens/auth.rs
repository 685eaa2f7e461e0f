use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, AuthField},
    ui::{
        components::{centered, input::Input},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let form = &state.auth;
    let card_area = centered(44, 11, area);

    frame.render_widget(Clear, card_area);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", form.mode.title()),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.surface));

    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Email
            Constraint::Length(1),
            Constraint::Length(1), // Password
            Constraint::Length(1),
            Constraint::Length(1), // Submit
            Constraint::Length(1),
            Constraint::Length(1), // Mode switch
        ])
        .margin(1)
        .split(inner);

    Input {
        value: &form.email,
        placeholder: "Email",
        masked: false,
        focused: form.focus == AuthField::Email,
    }
    .render(frame, rows[0], theme);

    Input {
        value: &form.password,
        placeholder: "Password",
        masked: true,
        focused: form.focus == AuthField::Password,
    }
    .render(frame, rows[2], theme);

    let button = Span::styled(
        format!("[ {} ]", form.mode.action()),
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(
        Paragraph::new(button).alignment(Alignment::Center),
        rows[4],
    );

    let switch = Line::from(vec![
        Span::styled(form.mode.switch_hint(), Style::default().fg(theme.text_muted)),
        Span::styled(" (Ctrl+T)", Style::default().fg(theme.disabled)),
    ]);
    frame.render_widget(
        Paragraph::new(switch).alignment(Alignment::Center),
        rows[6],
    );
}
