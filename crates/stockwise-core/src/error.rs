//! # Error Types
//!
//! Domain-specific error types for stockwise-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockwise-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockwise-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Controller boundary (desktop app)                                     │
//! │  └── OpError          - ErrorKind + message the UI displays            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │                            DbError ─┴→ OpError → UI                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A stock change would leave the product below zero.
    ///
    /// ## When This Occurs
    /// - An exit or adjustment larger than the stock on hand
    ///
    /// The product and its ledger are left untouched.
    #[error("Stock cannot go negative: {current} on hand, change of {delta}")]
    NegativeStock { current: i64, delta: i64 },

    /// A stock change overflowed the integer range.
    #[error("Stock change of {delta} overflows the current level {current}")]
    StockOverflow { current: i64, delta: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Amount or quantity below zero where only zero and up are allowed.
    #[error("{field} cannot be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid UUID, unparseable amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., product code already registered).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Shorthand for [`ValidationError::MustNotBeNegative`].
    pub fn negative(field: impl Into<String>) -> Self {
        ValidationError::MustNotBeNegative {
            field: field.into(),
        }
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::NegativeStock {
            current: 50,
            delta: -60,
        };
        assert_eq!(
            err.to_string(),
            "Stock cannot go negative: 50 on hand, change of -60"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("code").to_string(), "code is required");
        assert_eq!(
            ValidationError::negative("cost price").to_string(),
            "cost price cannot be negative"
        );
        let err = ValidationError::Duplicate {
            field: "code".to_string(),
            value: "001".to_string(),
        };
        assert_eq!(err.to_string(), "code '001' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("name").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
