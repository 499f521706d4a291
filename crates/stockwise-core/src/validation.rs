//! # Validation Module
//!
//! Input validation for categories and products.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Controller (desktop app)                                     │
//! │  └── Calls THIS MODULE before touching the database                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Controller uniqueness checks (code / name lookups)           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  ├── CHECK (current_stock >= 0)                                        │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_CODE_LEN: usize = 50;
const MAX_CATEGORY_NAME_LEN: usize = 100;
const MAX_PRODUCT_NAME_LEN: usize = 200;
const MAX_UNIT_LEN: usize = 20;
const MAX_REASON_LEN: usize = 100;
const MAX_SEARCH_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Checks a required text field and returns it trimmed.
fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates a product code.
///
/// ## Rules
/// - Must not be blank
/// - At most 50 characters
///
/// ## Example
/// ```rust
/// use stockwise_core::validation::validate_code;
///
/// assert_eq!(validate_code(" 001 ").unwrap(), "001");
/// assert!(validate_code("   ").is_err());
/// ```
pub fn validate_code(code: &str) -> ValidationResult<String> {
    required_text("code", code, MAX_CODE_LEN)
}

/// Validates a product name (1-200 characters after trimming).
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    required_text("name", name, MAX_PRODUCT_NAME_LEN)
}

/// Validates a category name (1-100 characters after trimming).
pub fn validate_category_name(name: &str) -> ValidationResult<String> {
    required_text("name", name, MAX_CATEGORY_NAME_LEN)
}

/// Validates a unit of measure; `None` or blank falls back to the default.
pub fn validate_unit(unit: Option<&str>) -> ValidationResult<String> {
    match unit.map(str::trim).filter(|u| !u.is_empty()) {
        None => Ok(crate::types::DEFAULT_UNIT.to_string()),
        Some(unit) => required_text("unit", unit, MAX_UNIT_LEN),
    }
}

/// Validates the reason written on a stock movement.
pub fn validate_reason(reason: &str) -> ValidationResult<String> {
    required_text("reason", reason, MAX_REASON_LEN)
}

/// Validates a search text. Blank is allowed (means "everything").
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price. Zero is allowed (free items), negatives are not.
///
/// ## Example
/// ```rust
/// use stockwise_core::money::Money;
/// use stockwise_core::validation::validate_price;
///
/// assert!(validate_price("cost price", Money::from_cents(1500)).is_ok());
/// assert!(validate_price("cost price", Money::zero()).is_ok());
/// assert!(validate_price("cost price", Money::from_cents(-1)).is_err());
/// ```
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::negative(field));
    }

    Ok(())
}

/// Validates a stock figure (initial or minimum stock): zero or more.
pub fn validate_stock_level(field: &str, level: i64) -> ValidationResult<()> {
    if level < 0 {
        return Err(ValidationError::negative(field));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
