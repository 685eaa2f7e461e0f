use ledger::{Currency, MoneyCents};
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// An amount with the currency symbol, e.g. `₹ 4.50`.
#[must_use]
pub fn styled_amount(amount: MoneyCents, currency: Currency, theme: &Theme) -> Span<'static> {
    Span::styled(amount.format(currency), Style::default().fg(theme.amount))
}

/// Bold variant used for the running total.
#[must_use]
pub fn styled_total(amount: MoneyCents, currency: Currency, theme: &Theme) -> Span<'static> {
    Span::styled(
        amount.format(currency),
        Style::default()
            .fg(theme.amount)
            .add_modifier(Modifier::BOLD),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_use_symbol_and_two_decimals() {
        let theme = Theme::default();
        let span = styled_amount(MoneyCents::new(450), Currency::Inr, &theme);
        assert_eq!(span.content, "₹ 4.50");

        let span = styled_total(MoneyCents::ZERO, Currency::Eur, &theme);
        assert_eq!(span.content, "€ 0.00");
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
    }
}
