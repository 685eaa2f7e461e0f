pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{AppState, AuthMode, Screen};
use theme::Theme;

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = Theme::default();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    if state.screen == Screen::Splash {
        screens::splash::render(frame, area, &theme);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    match state.screen {
        Screen::Unauthenticated => screens::auth::render(frame, layout[0], state, &theme),
        Screen::Authenticated => screens::ledger::render(frame, layout[0], state, &theme),
        Screen::Splash => {}
    }

    render_bottom_bar(frame, layout[1], state, &theme);
    components::confirm::render(frame, area, state.confirm.as_ref(), &theme);
    components::alert::render(frame, area, state.alert.as_ref(), &theme);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = Vec::new();
    for (key, label) in context_hints(state) {
        if !parts.is_empty() {
            parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        }
        parts.push(Span::styled(key, Style::default().fg(theme.accent)));
        parts.push(Span::raw(format!(" {label}")));
    }
    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

/// Keyboard hints for whatever currently has the input.
fn context_hints(state: &AppState) -> Vec<(&'static str, &'static str)> {
    if state.alert.is_some() {
        return vec![("Enter", "dismiss"), ("Ctrl+C", "quit")];
    }
    if state.confirm.is_some() {
        return vec![("y", "delete"), ("n", "cancel")];
    }
    match state.screen {
        Screen::Splash => Vec::new(),
        Screen::Unauthenticated => vec![
            ("Tab", "next field"),
            (
                "Enter",
                match state.auth.mode {
                    AuthMode::Login => "login",
                    AuthMode::Signup => "sign up",
                },
            ),
            ("Ctrl+T", "switch form"),
            ("Ctrl+C", "quit"),
        ],
        Screen::Authenticated => vec![
            ("Tab", "next field"),
            ("Enter", "add"),
            ("↑↓", "select"),
            ("Del", "delete"),
            ("Ctrl+R", "reload"),
            ("Ctrl+L", "logout"),
            ("Ctrl+C", "quit"),
        ],
    }
}
