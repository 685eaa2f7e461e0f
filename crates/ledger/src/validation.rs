//! Checks gating the add-expense action.

use crate::{MoneyCents, ValidationError};

/// Validated input for a new expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseInput {
    pub title: String,
    pub amount: MoneyCents,
}

/// Validate the raw form fields of a new expense.
///
/// The title must be non-empty after trimming and the amount must parse to a
/// non-negative number. The returned title is kept exactly as typed.
pub fn validate_expense(title: &str, amount: &str) -> Result<ExpenseInput, ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }

    let amount: MoneyCents = amount.parse()?;
    if amount.is_negative() {
        return Err(ValidationError::InvalidAmount);
    }

    Ok(ExpenseInput {
        title: title.to_string(),
        amount,
    })
}

/// Whether the add button is enabled: both fields hold something.
pub fn can_submit(title: &str, amount: &str) -> bool {
    !title.trim().is_empty() && !amount.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_stored_as_typed() {
        let input = validate_expense("  Coffee ", "4.50").unwrap();
        assert_eq!(input.title, "  Coffee ");
        assert_eq!(input.amount, MoneyCents::new(450));
    }

    #[test]
    fn zero_is_a_valid_amount() {
        assert_eq!(
            validate_expense("Gift", "0").unwrap().amount,
            MoneyCents::ZERO
        );
    }

    #[test]
    fn rejects_blank_title() {
        assert_eq!(
            validate_expense("   ", "5"),
            Err(ValidationError::MissingTitle)
        );
    }

    #[test]
    fn rejects_negative_or_unparsable_amount() {
        assert_eq!(
            validate_expense("Pen", "-1"),
            Err(ValidationError::InvalidAmount)
        );
        assert_eq!(
            validate_expense("Pen", "ten"),
            Err(ValidationError::InvalidAmount)
        );
    }

    #[test]
    fn title_is_checked_before_amount() {
        assert_eq!(validate_expense("", "x"), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn submit_needs_both_fields() {
        assert!(can_submit("Book", "12"));
        assert!(!can_submit("Book", " "));
        assert!(!can_submit("", "12"));
    }
}
