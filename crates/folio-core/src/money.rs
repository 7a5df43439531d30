//! # Money Module
//!
//! Integer-cent money. Every price, line total and order total in Folio is
//! a `Money`, so order totals add up exactly.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Book.price_cents ──► OrderLine.unit_price_cents (frozen at checkout)   │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                  × quantity = line total                                │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                  Σ line totals = Order.total_cents                      │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                  Σ order totals = SalesReport.total_revenue_cents       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use folio_core::money::Money;
//!
//! let price = Money::from_cents(1000); // $10.00
//! let line = price.checked_times(2).unwrap();
//! assert_eq!(line.cents(), 2000);
//! assert_eq!(line.to_string(), "$20.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// Signed so that refunds and corrections can be expressed, although the
/// checkout path only ever produces non-negative amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from dollars and cents.
    ///
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(25, 0).cents(), 2500);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole dollars, truncated toward zero.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// The cents portion, always 0-99.
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

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// Order totals are built with this rather than `*` so that an absurd
    /// quantity surfaces as an error instead of wrapping.
    #[inline]
    pub const fn checked_times(&self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders as `$20.00` / `-$5.50`. Used in logs; the storefront formats
/// cents itself.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Money(cents)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_dollars_and_cents() {
        assert_eq!(Money::from_cents(2000).to_string(), "$20.00");
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
    }

    #[test]
    fn test_major_minor() {
        assert_eq!(Money::from_major_minor(10, 0).cents(), 1000);
        assert_eq!(Money::from_major_minor(0, 99).cents(), 99);
        assert_eq!(Money::from_major_minor(-1, 25).cents(), -125);
    }

    #[test]
    fn test_checked_times() {
        let price = Money::from_cents(1000);
        assert_eq!(price.checked_times(2), Some(Money::from_cents(2000)));
        assert_eq!(price.checked_times(0), Some(Money::zero()));
        assert_eq!(Money::from_cents(i64::MAX).checked_times(2), None);
    }

    #[test]
    fn test_checked_add_overflow() {
        assert_eq!(
            Money::from_cents(1).checked_add(Money::from_cents(2)),
            Some(Money::from_cents(3))
        );
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }

    #[test]
    fn test_sum_is_exact() {
        // Ten lines of $0.10 must total exactly $1.00
        let total: Money = std::iter::repeat(Money::from_cents(10)).take(10).sum();
        assert_eq!(total.cents(), 100);
    }

    #[test]
    fn test_arithmetic() {
        let mut m = Money::from_cents(500);
        m += Money::from_cents(250);
        assert_eq!(m.cents(), 750);
        assert_eq!((m - Money::from_cents(50)).cents(), 700);
        assert_eq!((m * 2).cents(), 1500);
        assert!(Money::default().is_zero());
        assert!(Money::from_cents(-1).is_negative());
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_cents(1999)).unwrap();
        assert_eq!(json, "1999");
    }
}
