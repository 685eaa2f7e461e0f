use serde::{Deserialize, Serialize};

/// Currency used to display amounts.
///
/// The ledger is mono-currency: one currency is picked in configuration and
/// every amount is shown with its symbol. Amounts are always stored as cents
/// (see [`MoneyCents`](crate::MoneyCents)), so both supported currencies use
/// two fraction digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Eur,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Eur => "EUR",
        }
    }

    /// Symbol used as display prefix.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Inr => "₹",
            Currency::Eur => "€",
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "INR" => Ok(Currency::Inr),
            "EUR" => Ok(Currency::Eur),
            other => Err(format!("unsupported currency: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!(Currency::try_from("inr"), Ok(Currency::Inr));
        assert_eq!(Currency::try_from(" EUR "), Ok(Currency::Eur));
        assert!(Currency::try_from("usd").is_err());
    }

    #[test]
    fn default_is_rupee() {
        assert_eq!(Currency::default().symbol(), "₹");
    }
}
