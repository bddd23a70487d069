//! Money type for representing prices.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues. On the wire, prices are plain decimal numbers
//! (`179.9`), matching the storefront API and the persisted snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest decimal amount accepted from the wire; keeps cents exact in f64.
const MAX_DECIMAL: f64 = 90_071_992_547_409.91;

/// Display currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    BRL,
    USD,
    EUR,
}

impl Currency {
    /// Get the currency code (e.g., "BRL").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BRL => "BRL",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }

    /// Get the currency symbol (e.g., "R$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BRL => "R$",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
        }
    }

    /// Separator between whole units and cents.
    fn decimal_separator(&self) -> char {
        match self {
            Currency::USD => '.',
            Currency::BRL | Currency::EUR => ',',
        }
    }

    /// Separator between groups of thousands.
    fn group_separator(&self) -> char {
        match self {
            Currency::USD => ',',
            Currency::BRL | Currency::EUR => '.',
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A non-negative price in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: u64,
}

impl Money {
    /// Create a new Money value from cents.
    pub const fn new(amount_cents: u64) -> Self {
        Self { amount_cents }
    }

    /// Create a zero amount.
    pub const fn zero() -> Self {
        Self::new(0)
    }

    /// Create a Money value from a decimal amount.
    ///
    /// Returns `None` for negative, non-finite or absurdly large amounts.
    ///
    /// ```
    /// use rocket_cart::money::Money;
    /// let price = Money::from_decimal(179.9).unwrap();
    /// assert_eq!(price.amount_cents, 17990);
    /// ```
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() || amount < 0.0 || amount > MAX_DECIMAL {
            return None;
        }
        Some(Self::new((amount * 100.0).round() as u64))
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }

    /// Try to add another Money value, returning None on overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        self.amount_cents.checked_add(other.amount_cents).map(Money::new)
    }

    /// Try to multiply by a quantity, returning None on overflow.
    pub fn try_multiply(&self, quantity: u32) -> Option<Money> {
        self.amount_cents
            .checked_mul(u64::from(quantity))
            .map(Money::new)
    }

    /// Format for display in the given currency (e.g., "R$ 1.234,56").
    pub fn display(&self, currency: Currency) -> String {
        let whole = self.amount_cents / 100;
        let cents = self.amount_cents % 100;

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(currency.group_separator());
            }
            grouped.push(ch);
        }

        let space = if currency == Currency::USD { "" } else { " " };
        format!(
            "{}{}{}{}{:02}",
            currency.symbol(),
            space,
            grouped,
            currency.decimal_separator(),
            cents
        )
    }
}

impl TryFrom<f64> for Money {
    type Error = String;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        Money::from_decimal(amount).ok_or_else(|| format!("invalid price: {}", amount))
    }
}

impl From<Money> for f64 {
    fn from(money: Money) -> Self {
        money.to_decimal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal() {
        assert_eq!(Money::from_decimal(139.9).unwrap().amount_cents, 13990);
        assert_eq!(Money::from_decimal(0.0).unwrap(), Money::zero());
        assert!(Money::from_decimal(-0.01).is_none());
        assert!(Money::from_decimal(f64::NAN).is_none());
        assert!(Money::from_decimal(f64::INFINITY).is_none());
    }

    #[test]
    fn test_wire_format() {
        let price: Money = serde_json::from_str("179.9").unwrap();
        assert_eq!(price.amount_cents, 17990);
        assert_eq!(serde_json::to_string(&price).unwrap(), "179.9");
        assert!(serde_json::from_str::<Money>("-5").is_err());
    }

    #[test]
    fn test_arithmetic() {
        let price = Money::new(17990);
        assert_eq!(price.try_multiply(3).unwrap().amount_cents, 53970);
        assert!(Money::new(u64::MAX).try_multiply(2).is_none());
        assert_eq!(
            Money::new(100).try_add(&Money::new(250)).unwrap().amount_cents,
            350
        );
        assert!(Money::new(u64::MAX).try_add(&Money::new(1)).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new(17990).display(Currency::BRL), "R$ 179,90");
        assert_eq!(Money::new(123456).display(Currency::BRL), "R$ 1.234,56");
        assert_eq!(Money::new(123456789).display(Currency::USD), "$1,234,567.89");
        assert_eq!(Money::new(5).display(Currency::EUR), "\u{20ac} 0,05");
    }
}
