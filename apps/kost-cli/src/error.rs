//! # CLI Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in kost-cli                               │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  Result<T, CliError>                                                    │
//! │         │                                                               │
//! │         ├── DbError::NotFound ─────────────► NOT_FOUND                  │
//! │         ├── ValidationError / BookingError ► VALIDATION_ERROR           │
//! │         ├── ServiceError::Unavailable ─────► UNAVAILABLE                │
//! │         ├── Other DbError ─────────────────► DATABASE_ERROR (logged)    │
//! │         └── ConfigError ───────────────────► CONFIG_ERROR               │
//! │                                                                         │
//! │  main() prints the error as JSON on stderr and exits with status 1.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crate::config::ConfigError;
use kost_core::{BookingError, ValidationError};
use kost_db::{DbError, ServiceError};

/// Error printed when a command fails.
///
/// ```json
/// {
///   "code": "UNAVAILABLE",
///   "message": "No Type 1 room is free for the selected dates"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Record not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// No free room for the requested stay
    Unavailable,

    /// Database operation failed
    DatabaseError,

    /// Configuration could not be loaded
    ConfigError,

    /// Internal error
    Internal,
}

impl CliError {
    /// Creates a new CLI error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        CliError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to CLI errors.
impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CliError::not_found(&entity, &id),
            DbError::UniqueViolation { field, .. } => {
                CliError::validation(format!("{} already exists", field))
            }
            DbError::Invalid(e) => CliError::validation(e.to_string()),
            DbError::ConnectionFailed(_) => {
                CliError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                CliError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // CHECK constraint messages stay in the log
                tracing::error!("Database query failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                CliError::validation("Invalid reference")
            }
            DbError::PoolExhausted => {
                CliError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Booking(e) => e.into(),
            ServiceError::Validation(e) => e.into(),
            ServiceError::Unavailable { .. } => CliError::new(ErrorCode::Unavailable, err.to_string()),
            ServiceError::Db(e) => e.into(),
        }
    }
}

impl From<BookingError> for CliError {
    fn from(err: BookingError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("Could not encode output: {}", err))
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;
