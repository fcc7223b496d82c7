//! # Money Module
//!
//! Provides the `Money` type used for service prices.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    "45.90" is parsed once into 4590 and never touches a float          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use salon_core::money::Money;
//!
//! let haircut: Money = "45.90".parse().unwrap();
//! assert_eq!(haircut.cents(), 4590);
//! assert_eq!(haircut.to_string(), "R$ 45,90");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (the smallest BRL unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: a negative price can be represented so validation can
///   reject it with a proper message instead of failing to parse
/// - **Single field tuple struct**: zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use salon_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // R$ 10,99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole reais (truncated toward zero).
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Centavos portion, always 0-99.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is strictly greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Sum of two amounts, or `None` when it does not fit in an i64.
    ///
    /// ## Example
    /// ```rust
    /// use salon_core::money::Money;
    ///
    /// let total = Money::from_cents(4590).checked_add(Money::from_cents(6000));
    /// assert_eq!(total, Some(Money::from_cents(10590)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    /// ```
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a decimal amount with at most two fractional digits.
///
/// Accepts `.` or `,` as the decimal separator and an optional `R$` prefix,
/// so `"45"`, `"45.9"`, `"45,90"` and `"R$ 45,90"` are all 4590 centavos.
/// Thousands separators are not accepted.
impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidAmount(s.to_string());

        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix("R$").unwrap_or(trimmed).trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (major, minor) = match digits.split_once(['.', ',']) {
            Some((major, minor)) => (major, minor),
            None => (digits, ""),
        };

        if major.is_empty()
            || minor.len() > 2
            || !major.chars().all(|c| c.is_ascii_digit())
            || !minor.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let major: i64 = major.parse().map_err(|_| invalid())?;
        let minor: i64 = match minor.len() {
            0 => 0,
            1 => minor.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => minor.parse().map_err(|_| invalid())?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(invalid)?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Brazilian display format: `R$ 45,90`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}R$ {},{:02}",
            sign,
            self.reais().unsigned_abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.reais(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(4590).to_string(), "R$ 45,90");
        assert_eq!(Money::from_cents(500).to_string(), "R$ 5,00");
        assert_eq!(Money::from_cents(-550).to_string(), "-R$ 5,50");
        assert_eq!(Money::zero().to_string(), "R$ 0,00");
    }

    #[test]
    fn test_parse_accepts_both_separators() {
        assert_eq!("45.90".parse::<Money>().unwrap().cents(), 4590);
        assert_eq!("45,90".parse::<Money>().unwrap().cents(), 4590);
        assert_eq!("45,9".parse::<Money>().unwrap().cents(), 4590);
        assert_eq!("45".parse::<Money>().unwrap().cents(), 4500);
        assert_eq!("R$ 120,00".parse::<Money>().unwrap().cents(), 12000);
        assert_eq!("-3.5".parse::<Money>().unwrap().cents(), -350);
        assert_eq!("0".parse::<Money>().unwrap(), Money::zero());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234,56".parse::<Money>().is_err());
        assert!("10.999".parse::<Money>().is_err());
        assert!(".50".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_positivity() {
        assert!(Money::from_cents(1).is_positive());
        assert!(!Money::zero().is_positive());
        assert!(!Money::from_cents(-100).is_positive());
    }

    #[test]
    fn test_checked_add() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);
        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(b), None);
        assert_eq!(Money::from_cents(i64::MIN).checked_add(Money::from_cents(-1)), None);
    }

    #[test]
    fn test_display_extremes() {
        assert_eq!(Money::from_cents(i64::MIN).to_string(), "-R$ 92233720368547758,08");
    }
}
