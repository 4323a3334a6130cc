//! # Domain Types
//!
//! Core domain types used throughout the booking engine.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Quoting (transient)          Records (persisted by kost-db)           │
//! │  ───────────────────          ──────────────────────────────           │
//! │  RoomRate                     Property ──< Room ──< Reservation        │
//! │  DateRange                    Order                                    │
//! │  BookingQuote                 Review                                   │
//! │                                                                         │
//! │  Availability seam                                                     │
//! │  ─────────────────                                                     │
//! │  RoomInstance { id, category_id }                                      │
//! │  ReservationSpan { room_id, check_in, check_out }                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Calendar Dates
//! Stays use `chrono::NaiveDate`: no time of day, no timezone. Comparing
//! two stays never depends on where the server runs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::calculator::PricingStrategy;
use crate::error::{BookingError, BookingResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Room Rate
// =============================================================================

/// The price of one billing month for a room category.
///
/// Every room in a category shares one rate, so a quote only needs the
/// category and its monthly price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomRate {
    /// Room category, e.g. "Type 1".
    pub category_id: String,

    /// Price of one billing month.
    pub monthly_price: Money,
}

impl RoomRate {
    pub fn new(category_id: impl Into<String>, monthly_price: Money) -> Self {
        RoomRate {
            category_id: category_id.into(),
            monthly_price,
        }
    }
}

// =============================================================================
// Date Range
// =============================================================================

/// A stay from check-in to check-out, both calendar dates.
///
/// ## Invariant
/// `check_out` is strictly after `check_in`. The only constructor enforces
/// it, so a `DateRange` in hand is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

/// Unchecked wire shape, validated on the way into [`DateRange`].
#[derive(Deserialize)]
struct RawDateRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = BookingError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.check_in, raw.check_out)
    }
}

impl DateRange {
    /// Creates a range, failing with `InvalidRange` unless check-out is
    /// strictly after check-in.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use kost_core::DateRange;
    ///
    /// let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
    /// assert!(DateRange::new(d(1, 15), d(2, 14)).is_ok());
    /// assert!(DateRange::new(d(1, 15), d(1, 15)).is_err());
    /// ```
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> BookingResult<Self> {
        if check_out <= check_in {
            return Err(BookingError::InvalidRange {
                check_in,
                check_out,
            });
        }

        Ok(DateRange {
            check_in,
            check_out,
        })
    }

    #[inline]
    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    #[inline]
    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of calendar days between check-in and check-out (always >= 1).
    pub fn calendar_days(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Boundary-inclusive overlap with another stay.
    ///
    /// An existing stay conflicts when its check-out is on or after our
    /// check-in AND its check-in is on or before our check-out. Touching
    /// boundaries (checking out the day someone checks in) count as a
    /// conflict, so the same room is never handed over on the same day.
    pub fn conflicts_with(&self, other_check_in: NaiveDate, other_check_out: NaiveDate) -> bool {
        other_check_out >= self.check_in && other_check_in <= self.check_out
    }
}

// =============================================================================
// Booking Quote
// =============================================================================

/// Result of pricing a stay. Recomputed on every selection change and
/// never persisted directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BookingQuote {
    /// Billing units: months for `MonthlyUnits`, days for `DailyProrated`.
    pub duration_units: u32,

    /// Total for the whole stay.
    pub total_price: Money,

    /// Strategy that produced this quote.
    pub strategy: PricingStrategy,
}

// =============================================================================
// Availability Seam Types
// =============================================================================

/// A physical room as seen by the availability checker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RoomInstance {
    pub id: String,
    pub category_id: String,
}

/// The dates an active reservation holds a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ReservationSpan {
    pub room_id: String,
    #[ts(as = "String")]
    pub check_in: NaiveDate,
    #[ts(as = "String")]
    pub check_out: NaiveDate,
}

impl ReservationSpan {
    /// Whether this reservation blocks the requested stay.
    #[inline]
    pub fn conflicts_with(&self, range: &DateRange) -> bool {
        range.conflicts_with(self.check_in, self.check_out)
    }
}

// =============================================================================
// Property & Room
// =============================================================================

/// A kost building owned by one owner.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Property {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub description: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A rentable room inside a property.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Room {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Property this room belongs to.
    pub property_id: String,

    /// Door number shown to renters, e.g. "101".
    pub room_number: String,

    /// Category sharing one rate, e.g. "Type 1".
    pub category_id: String,

    /// Price of one billing month in rupiah.
    pub monthly_price: i64,

    /// Free-form facility list ("Kasur, Lemari, AC").
    pub facilities: Option<String>,

    /// Owner-controlled listing flag. Unlisted rooms are never offered.
    pub is_available: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Returns the monthly price as Money.
    #[inline]
    pub fn monthly_price(&self) -> Money {
        Money::from_rupiah(self.monthly_price)
    }

    /// Returns the category rate this room is sold at.
    pub fn rate(&self) -> RoomRate {
        RoomRate::new(self.category_id.clone(), self.monthly_price())
    }
}

// =============================================================================
// Reservation
// =============================================================================

/// Lifecycle of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Room is held for the stay. Only active reservations block availability.
    #[default]
    Active,
    /// Stay finished.
    Completed,
    /// Reservation withdrawn.
    Cancelled,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationStatus::Active => write!(f, "active"),
            ReservationStatus::Completed => write!(f, "completed"),
            ReservationStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(ReservationStatus::Active),
            "completed" => Ok(ReservationStatus::Completed),
            "cancelled" | "canceled" => Ok(ReservationStatus::Cancelled),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: vec![
                    "active".to_string(),
                    "completed".to_string(),
                    "cancelled".to_string(),
                ],
            }),
        }
    }
}

/// A room held for a stay (table `bookings`).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Reservation {
    pub id: String,
    pub room_id: String,
    pub category_id: String,
    pub renter_id: Option<String>,
    /// Order that placed this reservation; `None` when entered by an owner.
    pub order_id: Option<String>,
    #[ts(as = "String")]
    pub check_in: NaiveDate,
    #[ts(as = "String")]
    pub check_out: NaiveDate,
    pub duration_months: i64,
    /// Total for the whole stay in rupiah.
    pub total_price: i64,
    pub status: ReservationStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_rupiah(self.total_price)
    }

    /// Returns the dates this reservation holds its room.
    pub fn span(&self) -> ReservationSpan {
        ReservationSpan {
            room_id: self.room_id.clone(),
            check_in: self.check_in,
            check_out: self.check_out,
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// Payment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, waiting for the owner to confirm payment.
    #[default]
    Pending,
    /// Owner confirmed the transfer.
    Paid,
    /// Abandoned or rejected.
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Paid => write!(f, "paid"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: vec![
                    "pending".to_string(),
                    "paid".to_string(),
                    "cancelled".to_string(),
                ],
            }),
        }
    }
}

/// How the renter pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    Qris,
    EWallet,
    Cash,
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "bank_transfer" | "transfer" => Ok(PaymentMethod::BankTransfer),
            "qris" => Ok(PaymentMethod::Qris),
            "e_wallet" | "ewallet" => Ok(PaymentMethod::EWallet),
            "cash" => Ok(PaymentMethod::Cash),
            _ => Err(ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                allowed: vec![
                    "bank_transfer".to_string(),
                    "qris".to_string(),
                    "e_wallet".to_string(),
                    "cash".to_string(),
                ],
            }),
        }
    }
}

/// A renter's order created on booking confirmation.
///
/// `total_payment` is the normalized total for the whole stay, never a
/// per-month rate.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,
    /// Human-facing number, `ORD-` + 10 digits.
    pub order_number: String,
    pub category_id: String,
    pub total_payment: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub payment_method: PaymentMethod,
    pub duration_months: i64,
    #[ts(as = "String")]
    pub check_in: NaiveDate,
    #[ts(as = "String")]
    pub check_out: NaiveDate,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn total_payment(&self) -> Money {
        Money::from_rupiah(self.total_payment)
    }
}

// =============================================================================
// Review
// =============================================================================

/// A renter's review of the kost.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Review {
    pub id: String,
    pub user_id: String,
    /// Display name at the time of writing.
    pub name: String,
    /// Star rating, 1 to 5.
    pub rating: i64,
    pub body: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
