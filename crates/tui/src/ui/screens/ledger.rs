use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
    app::{AppState, ExpenseField},
    ui::{
        components::{card::Card, input::Input, money},
        theme::Theme,
    },
};

const EMPTY_HISTORY: &str = "No expenses yet. Start adding!";

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let banner_height = u16::from(state.load_error.is_some());
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(4), // Total
            Constraint::Length(banner_height),
            Constraint::Length(5), // Add form
            Constraint::Min(3),    // History
        ])
        .split(area);

    render_header(frame, layout[0], theme);
    render_total(frame, layout[1], state, theme);
    if let Some(error) = &state.load_error {
        let banner = Line::from(vec![
            Span::styled(
                format!(" Could not load expenses: {error} "),
                Style::default().fg(theme.error),
            ),
            Span::styled("Ctrl+R", Style::default().fg(theme.accent)),
            Span::raw(" retry"),
        ]);
        frame.render_widget(Paragraph::new(banner), layout[2]);
    }
    render_form(frame, layout[3], state, theme);
    render_history(frame, layout[4], state, theme);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(16)])
        .split(area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            " My Budget",
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        )),
        columns[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Ctrl+L", Style::default().fg(theme.accent)),
            Span::styled(" Logout ", Style::default().fg(theme.error)),
        ]))
        .alignment(Alignment::Right),
        columns[1],
    );
}

fn render_total(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let lines = vec![
        Line::from(Span::styled(
            "Total Spent",
            Style::default().fg(theme.text_muted),
        )),
        Line::from(money::styled_total(
            state.expenses.total(),
            state.currency,
            theme,
        )),
    ];
    Card::new("", theme).render_with(
        frame,
        area,
        Paragraph::new(lines).alignment(Alignment::Center),
    );
}

fn render_form(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card = Card::new("Add expense", theme).focused(state.confirm.is_none());
    let inner = card.inner(area);
    frame.render_widget(card.block(), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let form = &state.expense;
    Input {
        value: &form.title,
        placeholder: "What did you buy?",
        masked: false,
        focused: form.focus == ExpenseField::Title,
    }
    .render(frame, rows[0], theme);

    let amount_placeholder = format!("Amount ({})", state.currency.symbol());
    Input {
        value: &form.amount,
        placeholder: &amount_placeholder,
        masked: false,
        focused: form.focus == ExpenseField::Amount,
    }
    .render(frame, rows[1], theme);

    let button_style = if form.can_submit() {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.disabled)
    };
    frame.render_widget(
        Paragraph::new(Span::styled("[ ADD EXPENSE ]", button_style))
            .alignment(Alignment::Center),
        rows[2],
    );
}

fn render_history(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card = Card::new("History", theme);
    let inner = card.inner(area);
    frame.render_widget(card.block(), area);

    if state.expenses.is_empty() {
        let empty = Paragraph::new(Span::styled(
            EMPTY_HISTORY,
            Style::default().fg(theme.text_muted),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let width = usize::from(inner.width);
    let items: Vec<ListItem<'_>> = state
        .expenses
        .records()
        .iter()
        .map(|record| {
            let amount = money::styled_amount(record.amount, state.currency, theme);
            let used = record.title.chars().count() + amount.content.chars().count() + 3;
            let pad = " ".repeat(width.saturating_sub(used));
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {}", record.title), Style::default().fg(theme.text)),
                Span::raw(pad),
                amount,
            ]))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().bg(theme.border))
        .highlight_symbol("›");
    let mut list_state = ListState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(list, inner, &mut list_state);
}
