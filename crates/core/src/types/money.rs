//! Monetary amounts using decimal arithmetic.
//!
//! Prices are stored as `NUMERIC` in `PostgreSQL` and carried as
//! [`rust_decimal::Decimal`] in memory; never floats.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount paired with an ISO 4217 currency code.
///
/// The currency lives on the store (one currency per store), so most code
/// passes bare `Decimal`s and only builds a `Money` at display boundaries
/// (order messages, API responses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount in major units (e.g. 19.99).
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g. "USD", "EUR", "MAD").
    pub currency: String,
}

impl Money {
    /// Pair an amount with a currency code.
    #[must_use]
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// Format for human-readable output, e.g. `"19.99 USD"`.
    ///
    /// Used in WhatsApp order messages, where a plain `AMOUNT CODE` form is
    /// unambiguous across locales.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{:.2} {}", self.amount, self.currency)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_display_two_decimal_places() {
        let m = Money::new(Decimal::new(1999, 2), "USD");
        assert_eq!(m.display(), "19.99 USD");

        let whole = Money::new(Decimal::new(5, 0), "EUR");
        assert_eq!(whole.display(), "5.00 EUR");
    }
}
