//! # Validation Module
//!
//! Input validation for bookings, orders and reviews.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI / browser form                                           │
//! │  ├── Argument parsing (clap, serde)                                    │
//! │  └── Immediate feedback                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Contact details (name, email, phone)                              │
//! │  └── Reviews, categories, prices, ids                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kost_core::validation::{validate_email, validate_rating};
//!
//! validate_email("tamu@example.com").unwrap();
//! validate_rating(5).unwrap();
//! assert!(validate_rating(6).is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_RATING, MAX_REVIEW_LENGTH, MIN_RATING};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 254;
const MAX_CATEGORY_LENGTH: usize = 50;
const MAX_ROOM_NUMBER_LENGTH: usize = 20;
const MIN_PHONE_DIGITS: usize = 8;
const MAX_PHONE_DIGITS: usize = 15;

// =============================================================================
// Contact Validators
// =============================================================================

/// Validates a renter or reviewer name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 100 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    required_text("name", name, MAX_NAME_LENGTH)
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Must contain `@` with text on both sides, and a `.` after the `@`
/// - No whitespace, at most 254 characters
///
/// ## Example
/// ```rust
/// use kost_core::validation::validate_email;
///
/// assert!(validate_email("budi@mail.co.id").is_ok());
/// assert!(validate_email("budi@localhost").is_err());
/// assert!(validate_email("").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    required_text("email", email, MAX_EMAIL_LENGTH)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("missing '@'"))?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid("expected name@domain"));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("domain must contain a dot"));
    }

    Ok(())
}

/// Validates a phone number.
///
/// ## Rules
/// - Optional leading `+`
/// - Digits, spaces and hyphens only
/// - Between 8 and 15 digits
///
/// ## Example
/// ```rust
/// use kost_core::validation::validate_phone;
///
/// assert!(validate_phone("0812-3456-7890").is_ok());
/// assert!(validate_phone("+62 812 3456 7890").is_ok());
/// assert!(validate_phone("12345").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let body = phone.strip_prefix('+').unwrap_or(phone);

    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces and hyphens".to_string(),
        });
    }

    let digits = body.chars().filter(char::is_ascii_digit).count();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(ValidationError::OutOfRange {
            field: "phone digits".to_string(),
            min: MIN_PHONE_DIGITS as i64,
            max: MAX_PHONE_DIGITS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Review Validators
// =============================================================================

/// Validates a star rating (1 to 5 inclusive).
pub fn validate_rating(rating: i64) -> ValidationResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: MIN_RATING,
            max: MAX_RATING,
        });
    }

    Ok(())
}

/// Validates review text.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 1000 characters (counted as chars, not bytes)
pub fn validate_review_body(body: &str) -> ValidationResult<()> {
    required_text("review", body, MAX_REVIEW_LENGTH)
}

// =============================================================================
// Listing Validators
// =============================================================================

/// Validates a room category id such as `"Type 1"`.
pub fn validate_category(category_id: &str) -> ValidationResult<()> {
    required_text("category", category_id, MAX_CATEGORY_LENGTH)
}

/// Validates a room number label such as `"A-101"`.
pub fn validate_room_number(room_number: &str) -> ValidationResult<()> {
    required_text("room_number", room_number, MAX_ROOM_NUMBER_LENGTH)
}

/// Validates a monthly price in rupiah. Must be positive.
pub fn validate_monthly_price(rupiah: i64) -> ValidationResult<()> {
    if rupiah <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "monthly_price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a record id (properties, rooms and reservations use UUID v4).
///
/// `field` names the argument in the error message.
///
/// ## Example
/// ```rust
/// use kost_core::validation::validate_uuid;
///
/// assert!(validate_uuid("room", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("room", "101").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be an id, not a name or number".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Siti Aminah").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("budi@example.com").is_ok());
        assert!(validate_email("  budi@example.com  ").is_ok());

        assert!(matches!(
            validate_email(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_email("budi.example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("budi@").is_err());
        assert!(validate_email("budi@example").is_err());
        assert!(validate_email("budi@example.").is_err());
        assert!(validate_email("bu di@example.com").is_err());
        assert!(validate_email("a@b@example.com").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("081234567890").is_ok());
        assert!(validate_phone("0812-3456-7890").is_ok());
        assert!(validate_phone("+62 812 3456 7890").is_ok());

        assert!(validate_phone("").is_err());
        assert!(validate_phone("0812abc").is_err());
        assert!(validate_phone("1234567").is_err());
        assert!(validate_phone("1234567890123456").is_err());
        assert!(validate_phone("++6281234567").is_err());
    }

    #[test]
    fn test_validate_rating() {
        for rating in 1..=5 {
            assert!(validate_rating(rating).is_ok());
        }
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert!(validate_rating(-3).is_err());
    }

    #[test]
    fn test_validate_review_body_counts_chars() {
        assert!(validate_review_body("Kamarnya bersih").is_ok());
        assert!(validate_review_body("").is_err());
        // multi-byte chars count once each
        assert!(validate_review_body(&"é".repeat(1000)).is_ok());
        assert!(validate_review_body(&"é".repeat(1001)).is_err());
    }

    #[test]
    fn test_validate_listing_fields() {
        assert!(validate_category("Type 1").is_ok());
        assert!(validate_category("").is_err());
        assert!(validate_room_number("A-101").is_ok());
        assert!(validate_room_number(&"9".repeat(21)).is_err());
        assert!(validate_monthly_price(800_000).is_ok());
        assert!(validate_monthly_price(0).is_err());
        assert!(validate_monthly_price(-1).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("room", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(matches!(
            validate_uuid("property", "  "),
            Err(ValidationError::Required { field }) if field == "property"
        ));
        assert!(validate_uuid("room", "101").is_err());
    }
}
