//! # Error Types
//!
//! Domain-specific error types for kost-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kost-core errors (this file)                                          │
//! │  ├── BookingError     - Calculator failures (range, input)             │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── RepositoryError  - Collaborator failures (handled fail-open)      │
//! │                                                                         │
//! │  kost-db errors (separate crate)                                       │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── ServiceError     - Order confirmation flow                        │
//! │                                                                         │
//! │  Flow: ValidationError → BookingError → ServiceError → CliError        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `BookingError` is always returned to the caller synchronously. A wrong
//! range or a zero rate must never silently become a price of zero.

use chrono::NaiveDate;
use thiserror::Error;

// =============================================================================
// Booking Error
// =============================================================================

/// Errors raised by the booking calculator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// Check-out is on or before check-in.
    ///
    /// ## When This Occurs
    /// - Same-day range (check-out == check-in)
    /// - Dates entered in the wrong order
    #[error("Check-out {check_out} must be after check-in {check_in}")]
    InvalidRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    /// A rate, duration or price text cannot produce a valid price.
    ///
    /// ## When This Occurs
    /// - Monthly price is zero or negative
    /// - Duration is zero
    /// - Price text holds no digits
    /// - The total does not fit in an i64
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl BookingError {
    /// Creates an InvalidInput error.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        BookingError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation of contact details, reviews and records
/// before they reach the database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Repository Error
// =============================================================================

/// Failures reported by a [`RoomRepository`](crate::availability::RoomRepository).
///
/// The availability checker never propagates these to its caller; it logs
/// them and answers optimistically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Backend unreachable, timed out, or answered with an error.
    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for calculator results.
pub type BookingResult<T> = Result<T, BookingError>;

/// Convenience type alias for repository results.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_message() {
        let err = BookingError::InvalidRange {
            check_in: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Check-out 2024-01-15 must be after check-in 2024-01-15"
        );
    }

    #[test]
    fn test_invalid_input_message() {
        let err = BookingError::invalid_input("monthly_price", "must be positive");
        assert_eq!(err.to_string(), "Invalid monthly_price: must be positive");
    }

    #[test]
    fn test_validation_converts_to_booking_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let err: BookingError = validation_err.into();
        assert!(matches!(err, BookingError::Validation(_)));
    }

    #[test]
    fn test_repository_error_message() {
        let err = RepositoryError::Unavailable("timeout".to_string());
        assert_eq!(err.to_string(), "Repository unavailable: timeout");
    }
}
