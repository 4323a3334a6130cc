//! # Booking Calculator
//!
//! Turns a room rate and a stay into a duration and a total price.
//!
//! ## Billing Month Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      compute_duration                                   │
//! │                                                                         │
//! │  months = (year_out - year_in) * 12 + (month_out - month_in)           │
//! │  if day_out > day_in { months += 1 }                                   │
//! │  months = max(1, months)                                               │
//! │                                                                         │
//! │  check-in     check-out     months                                     │
//! │  ──────────   ──────────    ──────                                     │
//! │  2024-01-15   2024-01-20    1      (under a month bills as one)        │
//! │  2024-01-15   2024-02-14    1      (before the anniversary day)        │
//! │  2024-01-15   2024-02-15    1      (on the anniversary day)            │
//! │  2024-01-15   2024-02-16    2      (past it: next month starts)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Named Strategies
//! - [`PricingStrategy::MonthlyUnits`]: the booking page. Rate × months.
//! - [`PricingStrategy::DailyProrated`]: the legacy room page. Rate / 30 ×
//!   calendar days, rounded. Its rate usually arrives as price text
//!   ("Rp 800.000"), see [`parse_price_text`].
//!
//! Callers pick one explicitly. Nothing here guesses from context.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{BookingError, BookingResult};
use crate::money::Money;
use crate::types::{BookingQuote, DateRange, RoomRate};
use crate::DAYS_PER_BILLING_MONTH;

// =============================================================================
// Pricing Strategy
// =============================================================================

/// Which pricing path produced (or should produce) a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PricingStrategy {
    /// Whole billing months at the monthly rate.
    #[default]
    MonthlyUnits,

    /// Calendar days at monthly rate / 30, rounded half up.
    DailyProrated,
}

// =============================================================================
// Duration
// =============================================================================

/// Computes the number of billing months for a stay.
///
/// Fails with `InvalidRange` unless `check_out` is strictly after
/// `check_in`. The result is at least 1.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use kost_core::calculator::compute_duration;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
/// assert_eq!(compute_duration(d(1, 15), d(2, 14)).unwrap(), 1);
/// assert_eq!(compute_duration(d(1, 15), d(2, 16)).unwrap(), 2);
/// ```
pub fn compute_duration(check_in: NaiveDate, check_out: NaiveDate) -> BookingResult<u32> {
    let range = DateRange::new(check_in, check_out)?;
    Ok(billing_months(&range))
}

/// Billing months for an already-validated range.
pub fn billing_months(range: &DateRange) -> u32 {
    let check_in = range.check_in();
    let check_out = range.check_out();

    let mut months = (check_out.year() - check_in.year()) * 12
        + (check_out.month() as i32 - check_in.month() as i32);

    if check_out.day() > check_in.day() {
        months += 1;
    }

    months.max(1) as u32
}

// =============================================================================
// Totals
// =============================================================================

/// Computes the total for `duration_units` billing months.
///
/// Fails with `InvalidInput` when the rate is not positive, the duration
/// is zero, or the product overflows.
///
/// ## Example
/// ```rust
/// use kost_core::calculator::compute_total;
/// use kost_core::{Money, RoomRate};
///
/// let rate = RoomRate::new("Type 1", Money::from_rupiah(800_000));
/// assert_eq!(compute_total(&rate, 3).unwrap().rupiah(), 2_400_000);
/// assert!(compute_total(&rate, 0).is_err());
/// ```
pub fn compute_total(rate: &RoomRate, duration_units: u32) -> BookingResult<Money> {
    validate_rate(rate)?;
    validate_units(duration_units)?;

    rate.monthly_price
        .checked_multiply_units(duration_units)
        .ok_or_else(|| BookingError::invalid_input("total_price", "exceeds representable range"))
}

/// Computes the legacy per-day total: `monthly / 30 * days`, rounded.
///
/// Kept for the screen that bills by calendar day. Not interchangeable
/// with [`compute_total`].
pub fn compute_prorated_total(rate: &RoomRate, days: u32) -> BookingResult<Money> {
    validate_rate(rate)?;
    validate_units(days)?;

    rate.monthly_price
        .prorate_daily(days as i64, DAYS_PER_BILLING_MONTH)
        .ok_or_else(|| BookingError::invalid_input("total_price", "exceeds representable range"))
}

/// Prices a stay with the requested strategy.
pub fn quote(
    rate: &RoomRate,
    range: &DateRange,
    strategy: PricingStrategy,
) -> BookingResult<BookingQuote> {
    let (duration_units, total_price) = match strategy {
        PricingStrategy::MonthlyUnits => {
            let months = billing_months(range);
            (months, compute_total(rate, months)?)
        }
        PricingStrategy::DailyProrated => {
            let days = u32::try_from(range.calendar_days())
                .map_err(|_| BookingError::invalid_input("duration", "stay is too long"))?;
            (days, compute_prorated_total(rate, days)?)
        }
    };

    Ok(BookingQuote {
        duration_units,
        total_price,
        strategy,
    })
}

// =============================================================================
// Price Text
// =============================================================================

/// Extracts a rupiah amount from display text such as `"Rp 800.000"`.
///
/// Every non-digit is dropped, so both `.` and `,` separators work. Fails
/// with `InvalidInput` when no digits remain or the number is too large.
///
/// ## Example
/// ```rust
/// use kost_core::calculator::parse_price_text;
///
/// assert_eq!(parse_price_text("Rp 800.000").unwrap().rupiah(), 800_000);
/// assert!(parse_price_text("gratis").is_err());
/// ```
pub fn parse_price_text(text: &str) -> BookingResult<Money> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return Err(BookingError::invalid_input(
            "price",
            format!("no digits in '{}'", text.trim()),
        ));
    }

    digits
        .parse::<i64>()
        .map(Money::from_rupiah)
        .map_err(|_| BookingError::invalid_input("price", "exceeds representable range"))
}

// =============================================================================
// Helpers
// =============================================================================

fn validate_rate(rate: &RoomRate) -> BookingResult<()> {
    if !rate.monthly_price.is_positive() {
        return Err(BookingError::invalid_input(
            "monthly_price",
            format!("must be positive, got {}", rate.monthly_price.rupiah()),
        ));
    }
    Ok(())
}

fn validate_units(units: u32) -> BookingResult<()> {
    if units == 0 {
        return Err(BookingError::invalid_input("duration", "must be at least 1"));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
