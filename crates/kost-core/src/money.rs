//! # Money Module
//!
//! Provides the `Money` type for rupiah amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A daily rate derived as 800000 / 30 = 26666.666...                     │
//! │  Multiplying that float back by a day count drifts by a rupiah or two  │
//! │  depending on evaluation order.                                         │
//! │                                                                         │
//! │  OUR SOLUTION: Whole Rupiah in an i64                                   │
//! │    Rupiah has no minor unit in practice, so 1 = Rp 1.                   │
//! │    Division happens once, in i128, with explicit rounding.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kost_core::money::Money;
//!
//! let monthly = Money::from_rupiah(800_000);
//! let total = monthly.checked_multiply_units(3).unwrap();
//! assert_eq!(total.rupiah(), 2_400_000);
//! assert_eq!(total.to_string(), "Rp 2.400.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole rupiah.
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values are representable so validation can
///   reject them explicitly instead of wrapping
/// - **Single field tuple struct**: zero-cost over i64
/// - **No float constructor**: prices come from integers or price text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupiah.
    #[inline]
    pub const fn from_rupiah(rupiah: i64) -> Self {
        Money(rupiah)
    }

    /// Returns the value in whole rupiah.
    #[inline]
    pub const fn rupiah(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Formats with dot thousands separators after `symbol`.
    ///
    /// The sign goes before the symbol: `-Rp 15.000`.
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{} {}", sign, symbol, grouped)
    }

    /// Multiplies a per-unit price by a number of billing units.
    ///
    /// Returns `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use kost_core::money::Money;
    ///
    /// let rate = Money::from_rupiah(700_000);
    /// assert_eq!(rate.checked_multiply_units(2), Some(Money::from_rupiah(1_400_000)));
    /// assert_eq!(Money::from_rupiah(i64::MAX).checked_multiply_units(2), None);
    /// ```
    #[inline]
    pub fn checked_multiply_units(&self, units: u32) -> Option<Self> {
        self.0.checked_mul(units as i64).map(Money)
    }

    /// Prorates a monthly amount over a number of days.
    ///
    /// Computes `monthly / days_per_month * days`, rounded to the nearest
    /// rupiah with halves rounded up. Works in i128 so the intermediate
    /// product cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use kost_core::money::Money;
    ///
    /// let monthly = Money::from_rupiah(800_000);
    /// // 800000 / 30 * 7 = 186666.67 -> 186667
    /// assert_eq!(monthly.prorate_daily(7, 30).unwrap().rupiah(), 186_667);
    /// ```
    pub fn prorate_daily(&self, days: i64, days_per_month: i64) -> Option<Self> {
        if days_per_month <= 0 {
            return None;
        }

        let numerator = self.0 as i128 * days as i128;
        let denominator = days_per_month as i128;
        // floor((2n + d) / 2d) == round-half-up(n / d) for n >= 0
        let rounded = (2 * numerator + denominator).div_euclid(2 * denominator);

        i64::try_from(rounded).ok().map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Formats as Indonesian rupiah with dot thousands separators.
///
/// ```rust
/// use kost_core::money::Money;
///
/// assert_eq!(Money::from_rupiah(800_000).to_string(), "Rp 800.000");
/// assert_eq!(Money::from_rupiah(0).to_string(), "Rp 0");
/// ```
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("Rp"))
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_grouping() {
        assert_eq!(Money::from_rupiah(1).to_string(), "Rp 1");
        assert_eq!(Money::from_rupiah(999).to_string(), "Rp 999");
        assert_eq!(Money::from_rupiah(1_000).to_string(), "Rp 1.000");
        assert_eq!(Money::from_rupiah(2_400_000).to_string(), "Rp 2.400.000");
        assert_eq!(Money::from_rupiah(-15_000).to_string(), "-Rp 15.000");
    }

    #[test]
    fn test_format_with_other_symbol() {
        let amount = Money::from_rupiah(1_250_000);
        assert_eq!(amount.format_with_symbol("IDR"), "IDR 1.250.000");
        assert_eq!(amount.format_with_symbol("Rp"), amount.to_string());
    }

    #[test]
    fn test_multiply_units() {
        let rate = Money::from_rupiah(800_000);
        assert_eq!(rate.checked_multiply_units(3).unwrap().rupiah(), 2_400_000);
        assert_eq!(rate.checked_multiply_units(0).unwrap(), Money::zero());
    }

    #[test]
    fn test_prorate_daily_rounding() {
        let monthly = Money::from_rupiah(800_000);
        assert_eq!(monthly.prorate_daily(15, 30).unwrap().rupiah(), 400_000);
        assert_eq!(monthly.prorate_daily(30, 30).unwrap().rupiah(), 800_000);
        // 700000 / 30 = 23333.33
        assert_eq!(Money::from_rupiah(700_000).prorate_daily(1, 30).unwrap().rupiah(), 23_333);
        // exact half rounds up: 45 / 30 * 1 = 1.5
        assert_eq!(Money::from_rupiah(45).prorate_daily(1, 30).unwrap().rupiah(), 2);
    }

    #[test]
    fn test_prorate_rejects_bad_divisor() {
        assert!(Money::from_rupiah(800_000).prorate_daily(10, 0).is_none());
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 650]
            .into_iter()
            .map(Money::from_rupiah)
            .sum();
        assert_eq!(total.rupiah(), 1_000);
    }
}
