//! # Controller Error Type
//!
//! The error half of every controller mutation: a machine-readable
//! [`ErrorKind`] plus a message ready to show the user.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Stockwise                              │
//! │                                                                         │
//! │  Presentation                Controllers                                │
//! │  ────────────                ───────────                                │
//! │                                                                         │
//! │  products.adjust_stock(..)                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  OpResult<T> = Result<T, OpError>                                │  │
//! │  │         │                                                        │  │
//! │  │  ValidationError ─── blank name, negative price ──► Validation   │  │
//! │  │  lookup hit      ─── code / name already taken  ──► Duplicate    │  │
//! │  │  lookup miss     ─── no such id                 ──► NotFound     │  │
//! │  │  CoreError       ─── stock would go negative    ──► Conflict     │  │
//! │  │  DbError         ─── pool / query / commit      ──► Store        │  │
//! │  │         │                                                        │  │
//! │  │  Success ──────────────────────────────────────────► Ok(entity) │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  match result {                                                         │
//! │    Ok(product) => refresh_table(product),                               │
//! │    Err(e) if e.kind == ErrorKind::Validation => highlight_form(e),      │
//! │    Err(e) => show_dialog(e.message),                                    │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store failures are logged with their detail here and reach the user as
//! a generic message.

use serde::Serialize;
use stockwise_core::{CoreError, ValidationError};
use stockwise_db::DbError;
use thiserror::Error;

/// Result of a controller mutation.
pub type OpResult<T> = Result<T, OpError>;

/// Error returned from controller mutations.
///
/// ## Serialization
/// ```json
/// {
///   "kind": "CONFLICT",
///   "message": "Stock cannot go negative: 50 on hand, change of -60"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct OpError {
    /// Machine-readable category for programmatic handling
    pub kind: ErrorKind,

    /// Human-readable message for display
    pub message: String,
}

/// Failure categories of controller operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Input rejected before anything was written
    Validation,

    /// Unique code or name already taken
    Duplicate,

    /// No record with the given id
    NotFound,

    /// Operation not allowed in the current state (negative stock,
    /// category still in use, concurrent stock change)
    Conflict,

    /// The store failed (connection, query, transaction)
    Store,
}

impl OpError {
    /// Creates a new controller error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        OpError {
            kind,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        OpError::new(ErrorKind::Validation, message)
    }

    /// Creates a duplicate error.
    pub fn duplicate(message: impl Into<String>) -> Self {
        OpError::new(ErrorKind::Duplicate, message)
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        OpError::new(ErrorKind::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        OpError::new(ErrorKind::Conflict, message)
    }
}

/// Converts database errors to controller errors.
impl From<DbError> for OpError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => OpError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                OpError::duplicate(format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                OpError::validation("Invalid reference")
            }
            DbError::CheckViolation { message } => {
                tracing::warn!("Check constraint violation: {}", message);
                OpError::conflict("Operation would break a stock or status rule")
            }
            DbError::StaleWrite { entity, id } => OpError::conflict(format!(
                "{} {} was changed by another operation, please retry",
                entity, id
            )),
            DbError::Busy => OpError::conflict("The database is busy, please retry"),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                OpError::new(ErrorKind::Store, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                OpError::new(ErrorKind::Store, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                OpError::new(ErrorKind::Store, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                OpError::new(ErrorKind::Store, "Database transaction failed")
            }
            DbError::PoolExhausted => OpError::new(ErrorKind::Store, "Database pool exhausted"),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                OpError::new(ErrorKind::Store, "Database operation failed")
            }
        }
    }
}

/// Converts field validation errors to controller errors.
impl From<ValidationError> for OpError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Duplicate { .. } => OpError::duplicate(err.to_string()),
            other => OpError::validation(other.to_string()),
        }
    }
}

/// Converts core errors to controller errors.
impl From<CoreError> for OpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NegativeStock { .. } => OpError::conflict(err.to_string()),
            CoreError::StockOverflow { .. } => OpError::validation(err.to_string()),
            CoreError::Validation(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_screaming_snake_case() {
        let err = OpError::not_found("Product", "abc");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["kind"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: abc");
    }

    #[test]
    fn test_display_is_the_message() {
        let err = OpError::conflict("Stock cannot go negative");
        assert_eq!(err.to_string(), "Stock cannot go negative");
    }

    #[test]
    fn test_negative_stock_is_conflict() {
        let err: OpError = CoreError::NegativeStock {
            current: 50,
            delta: -60,
        }
        .into();

        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(err.message.contains("cannot go negative"));
    }

    #[test]
    fn test_validation_mapping() {
        let err: OpError = ValidationError::required("name").into();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "name is required");

        let err: OpError = CoreError::Validation(ValidationError::Duplicate {
            field: "code".to_string(),
            value: "001".to_string(),
        })
        .into();
        assert_eq!(err.kind, ErrorKind::Duplicate);
    }

    #[test]
    fn test_db_error_mapping() {
        let err: OpError = DbError::stale("Product", "abc").into();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let err: OpError = DbError::duplicate("categories.name", "Food").into();
        assert_eq!(err.kind, ErrorKind::Duplicate);

        let err: OpError = DbError::QueryFailed("disk I/O error".to_string()).into();
        assert_eq!(err.kind, ErrorKind::Store);
        assert!(!err.message.contains("disk"));
    }
}
