//! # kost-core: Booking Logic for the Kost Site
//!
//! This crate holds the booking calculator and the availability checker
//! for a kost (boarding-house) rental site. Apart from the injected
//! [`availability::RoomRepository`], nothing here touches I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kost Booking Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    kost-cli (clap)                              │   │
//! │  │    quote ─► check ─► order ─► review ─► rooms ─► summary        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kost-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐  ┌──────────────┐  ┌───────────┐  ┌─────────┐ │   │
//! │  │   │ calculator │  │ availability │  │ checkout  │  │ review  │ │   │
//! │  │   │  duration  │  │ RoomRepo ◄───┼──┼─ injected │  │ average │ │   │
//! │  │   │  total     │  │ fail-open    │  │ order no. │  │         │ │   │
//! │  │   └────────────┘  └──────────────┘  └───────────┘  └─────────┘ │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ implements RoomRepository              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kost-db (SQLite via sqlx)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`calculator`] - Billing months, totals, daily proration, price text
//! - [`availability`] - `RoomRepository` seam and the fail-open checker
//! - [`checkout`] - Quote-to-payment hand-off and order numbers
//! - [`review`] - Review input and rating averages
//! - [`dashboard`] - Owner summary counts
//! - [`types`] - Domain records (Room, Reservation, Order, ...)
//! - [`money`] - Whole-rupiah `Money`
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use kost_core::calculator::{compute_duration, compute_total};
//! use kost_core::{Money, RoomRate};
//!
//! let check_in = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let check_out = NaiveDate::from_ymd_opt(2024, 2, 16).unwrap();
//!
//! let months = compute_duration(check_in, check_out).unwrap();
//! let rate = RoomRate::new("Type 1", Money::from_rupiah(800_000));
//!
//! assert_eq!(months, 2);
//! assert_eq!(compute_total(&rate, months).unwrap().rupiah(), 1_600_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod availability;
pub mod calculator;
pub mod checkout;
pub mod dashboard;
pub mod error;
pub mod money;
pub mod review;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use availability::{AvailabilityChecker, AvailabilityResult, RoomRepository};
pub use calculator::PricingStrategy;
pub use checkout::{CheckoutSummary, ContactDetails};
pub use error::{BookingError, BookingResult, RepositoryError, RepositoryResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Days in one billing month for the daily-prorated strategy.
pub const DAYS_PER_BILLING_MONTH: i64 = 30;

/// Lowest star rating a review may carry.
pub const MIN_RATING: i64 = 1;

/// Highest star rating a review may carry.
pub const MAX_RATING: i64 = 5;

/// Maximum review length in characters.
pub const MAX_REVIEW_LENGTH: usize = 1000;

/// Number of recent orders and bookings on the owner summary.
pub const DEFAULT_RECENT_LIMIT: usize = 10;
