//! # Stock Arithmetic
//!
//! Pure rules for changing a product's stock level and describing the change
//! as a ledger entry.
//!
//! ## Adjustment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Adjustment                                     │
//! │                                                                         │
//! │  current = 50, delta = -60                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StockChange::plan(50, -60) ← THIS MODULE                              │
//! │       │                                                                 │
//! │       ├── 50 + (-60) < 0 → CoreError::NegativeStock (nothing written)  │
//! │       │                                                                 │
//! │       └── otherwise → StockChange { before, after, quantity = |delta| }│
//! │                          │                                              │
//! │                          ▼                                              │
//! │               StockChange::into_movement(product, kind, reason, notes) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{new_id, normalize_optional, MovementKind, StockMovement};

/// Reason written on the movement created together with a new product.
pub const INITIAL_STOCK_REASON: &str = "Initial stock";

/// Notes written on the movement created together with a new product.
pub const INITIAL_STOCK_NOTES: &str = "Product registration";

/// A validated change of stock level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockChange {
    pub before: i64,
    pub after: i64,
    /// Magnitude of the change (`|after - before|`).
    pub quantity: i64,
}

impl StockChange {
    /// Plans applying `delta` to `current`.
    ///
    /// ## Errors
    /// - [`CoreError::NegativeStock`] if the result would be below zero
    /// - [`CoreError::StockOverflow`] if the addition overflows
    ///
    /// ## Example
    /// ```rust
    /// use stockwise_core::stock::StockChange;
    ///
    /// let change = StockChange::plan(50, -10).unwrap();
    /// assert_eq!((change.before, change.after, change.quantity), (50, 40, 10));
    ///
    /// assert!(StockChange::plan(50, -60).is_err());
    /// ```
    pub fn plan(current: i64, delta: i64) -> CoreResult<Self> {
        let after = current
            .checked_add(delta)
            .ok_or(CoreError::StockOverflow { current, delta })?;

        if after < 0 {
            return Err(CoreError::NegativeStock { current, delta });
        }

        Ok(StockChange {
            before: current,
            after,
            quantity: delta.unsigned_abs() as i64,
        })
    }

    /// The change recorded when a product is registered with stock on hand.
    ///
    /// Returns `None` when there is nothing to record (zero initial stock).
    pub fn initial(initial_stock: i64) -> Option<Self> {
        (initial_stock > 0).then_some(StockChange {
            before: 0,
            after: initial_stock,
            quantity: initial_stock,
        })
    }

    /// Signed delta of this change.
    #[inline]
    pub fn delta(&self) -> i64 {
        self.after - self.before
    }

    /// Turns the change into a ledger entry for `product_id`.
    pub fn into_movement(
        self,
        product_id: &str,
        kind: MovementKind,
        reason: &str,
        notes: Option<&str>,
        at: DateTime<Utc>,
    ) -> StockMovement {
        StockMovement {
            id: new_id(),
            product_id: product_id.to_string(),
            kind,
            quantity: self.quantity,
            stock_before: self.before,
            stock_after: self.after,
            reason: reason.trim().to_string(),
            notes: normalize_optional(notes),
            created_at: at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_positive_and_negative() {
        let entry = StockChange::plan(0, 25).unwrap();
        assert_eq!((entry.before, entry.after, entry.quantity), (0, 25, 25));

        let exit = StockChange::plan(25, -25).unwrap();
        assert_eq!((exit.before, exit.after, exit.quantity), (25, 0, 25));
        assert_eq!(exit.delta(), -25);
    }

    #[test]
    fn test_plan_rejects_negative_result() {
        let err = StockChange::plan(50, -60).unwrap_err();
        assert!(matches!(
            err,
            CoreError::NegativeStock {
                current: 50,
                delta: -60
            }
        ));
    }

    #[test]
    fn test_plan_rejects_overflow() {
        assert!(matches!(
            StockChange::plan(i64::MAX, 1),
            Err(CoreError::StockOverflow { .. })
        ));
    }

    #[test]
    fn test_zero_delta_is_allowed() {
        let change = StockChange::plan(7, 0).unwrap();
        assert_eq!((change.before, change.after, change.quantity), (7, 7, 0));
    }

    #[test]
    fn test_initial() {
        assert_eq!(StockChange::initial(0), None);
        assert_eq!(StockChange::initial(-3), None);
        let change = StockChange::initial(50).unwrap();
        assert_eq!((change.before, change.after, change.quantity), (0, 50, 50));
    }

    #[test]
    fn test_into_movement_keeps_magnitude_and_snapshots() {
        let movement = StockChange::plan(50, -10)
            .unwrap()
            .into_movement("p-1", MovementKind::Exit, " Sale ", Some(""), Utc::now());

        assert_eq!(movement.quantity, 10);
        assert_eq!(movement.stock_before, 50);
        assert_eq!(movement.stock_after, 40);
        assert_eq!(movement.reason, "Sale");
        assert_eq!(movement.notes, None);
        assert_eq!(movement.kind, MovementKind::Exit);
    }
}
