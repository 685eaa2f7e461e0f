use ratatui::{Frame, layout::Rect, style::Style, text::Span, widgets::Paragraph};

use crate::ui::theme::Theme;

pub struct Input<'a> {
    pub value: &'a str,
    pub placeholder: &'a str,
    pub masked: bool,
    pub focused: bool,
}

impl Input<'_> {
    /// Single-line field: the value (or placeholder) followed by a cursor
    /// when focused.
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
        let cursor = if self.focused { "│" } else { "" };

        let span = if self.value.is_empty() {
            Span::styled(
                format!("{cursor}{}", self.placeholder),
                Style::default().fg(theme.disabled),
            )
        } else {
            let shown = if self.masked {
                mask(self.value)
            } else {
                self.value.to_string()
            };
            let color = if self.focused {
                theme.text
            } else {
                theme.text_muted
            };
            Span::styled(format!("{shown}{cursor}"), Style::default().fg(color))
        };

        frame.render_widget(Paragraph::new(span), area);
    }
}

/// One bullet per character.
fn mask(value: &str) -> String {
    "•".repeat(value.chars().count())
}
