//! # Checkout Hand-off
//!
//! What the booking page passes to the payment page.
//!
//! ## Price Convention
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quote(rate, range)  ──►  CheckoutSummary  ──►  Order                   │
//! │                                                                         │
//! │  monthly_price : rate for one billing month (display only)             │
//! │  total_price   : total for the whole stay  ──►  Order.total_payment    │
//! │                                                                         │
//! │  The total is never multiplied by the duration again downstream.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::calculator::{billing_months, quote, PricingStrategy};
use crate::error::BookingResult;
use crate::money::Money;
use crate::types::{DateRange, PaymentMethod, RoomRate};
use crate::validation::{validate_email, validate_name, validate_phone, ValidationResult};

/// Prefix of every order number.
pub const ORDER_NUMBER_PREFIX: &str = "ORD-";

// =============================================================================
// Checkout Summary
// =============================================================================

/// A priced stay ready for payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub category_id: String,
    #[ts(as = "String")]
    pub check_in: NaiveDate,
    #[ts(as = "String")]
    pub check_out: NaiveDate,
    /// Units the total was priced in (months or days, per `strategy`).
    pub duration_units: u32,
    pub strategy: PricingStrategy,
    /// Billing months of the stay, whatever the strategy.
    pub billing_months: u32,
    /// Rate of one billing month.
    pub monthly_price: Money,
    /// Total for the whole stay.
    pub total_price: Money,
}

impl CheckoutSummary {
    /// Prices `range` at `rate` and packages the result for payment.
    pub fn from_quote(
        rate: &RoomRate,
        range: &DateRange,
        strategy: PricingStrategy,
    ) -> BookingResult<Self> {
        let quote = quote(rate, range, strategy)?;

        Ok(CheckoutSummary {
            category_id: rate.category_id.clone(),
            check_in: range.check_in(),
            check_out: range.check_out(),
            duration_units: quote.duration_units,
            strategy: quote.strategy,
            billing_months: billing_months(range),
            monthly_price: rate.monthly_price,
            total_price: quote.total_price,
        })
    }
}

// =============================================================================
// Contact Details
// =============================================================================

/// Renter details collected on the payment page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
}

impl ContactDetails {
    /// Checks name, email and phone; returns a trimmed copy.
    pub fn validated(&self) -> ValidationResult<Self> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_phone(&self.phone)?;

        Ok(ContactDetails {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            payment_method: self.payment_method,
        })
    }
}

// =============================================================================
// Order Number
// =============================================================================

/// Builds an order number: `ORD-` + last 6 digits of the epoch
/// milliseconds + a 4-digit suffix.
///
/// The suffix is taken modulo 10000. Callers supply the randomness.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use kost_core::checkout::generate_order_number;
///
/// let at = Utc.timestamp_millis_opt(1_718_000_123_456).unwrap();
/// assert_eq!(generate_order_number(at, 42), "ORD-1234560042");
/// ```
pub fn generate_order_number(at: DateTime<Utc>, suffix: u16) -> String {
    let stamp = at.timestamp_millis().rem_euclid(1_000_000);
    format!("{}{:06}{:04}", ORDER_NUMBER_PREFIX, stamp, suffix % 10_000)
}
