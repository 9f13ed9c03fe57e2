//! Monetary amounts using decimal arithmetic.
//!
//! Balances and consultation package prices arrive from the backend as
//! decimal strings (`"123.52"`); they are never represented as floats.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes the portal displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Brazilian real.
    #[default]
    #[serde(rename = "BRL")]
    Brl,
}

impl Currency {
    /// Display symbol placed before the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Brl => "R$",
        }
    }
}

/// An amount of money in a single currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (reais, not centavos).
    pub amount: Decimal,
    /// Currency of the amount.
    #[serde(default)]
    pub currency: Currency,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Zero in the given currency.
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Build an amount from minor units (centavos).
    #[must_use]
    pub fn from_cents(cents: i64, currency: Currency) -> Self {
        Self {
            amount: Decimal::new(cents, 2),
            currency,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.2}",
            self.currency.symbol(),
            self.amount.round_dp(2)
        )
    }
}

impl Add for Money {
    type Output = Self;

    /// Adds two amounts. `Currency` has a single variant, so both sides
    /// always share it.
    fn add(self, rhs: Self) -> Self {
        Self {
            amount: self.amount + rhs.amount,
            currency: self.currency,
        }
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self {
            amount: self.amount * Decimal::from(rhs),
            currency: self.currency,
        }
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(Currency::default()), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_brl() {
        let balance = Money::from_cents(12352, Currency::Brl);
        assert_eq!(balance.to_string(), "R$ 123.52");
    }

    #[test]
    fn test_display_pads_decimals() {
        let price = Money::from_cents(3000, Currency::Brl);
        assert_eq!(price.to_string(), "R$ 30.00");
    }

    #[test]
    fn test_line_total_and_sum() {
        let unit = Money::from_cents(2990, Currency::Brl);
        let lines = [unit * 2, Money::from_cents(1000, Currency::Brl)];
        let total: Money = lines.into_iter().sum();
        assert_eq!(total, Money::from_cents(6980, Currency::Brl));
    }

    #[test]
    fn test_deserialize_decimal_string() {
        let money: Money = serde_json::from_str(r#"{"amount":"123.52","currency":"BRL"}"#)
            .expect("valid money json");
        assert_eq!(money, Money::from_cents(12352, Currency::Brl));
    }

    #[test]
    fn test_rejects_unknown_currency() {
        let parsed = serde_json::from_str::<Money>(r#"{"amount":"1.00","currency":"USD"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_deserialize_defaults_currency() {
        let money: Money = serde_json::from_str(r#"{"amount":"1.00"}"#).expect("valid json");
        assert_eq!(money.currency, Currency::Brl);
    }
}
