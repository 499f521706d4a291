//! # Domain Types
//!
//! Entity types shared by every layer of Stockwise.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────┐ 1   * ┌──────────────┐ 1   * ┌─────────────────┐     │
//! │  │   Category   │───────│   Product    │───────│  StockMovement  │     │
//! │  │  name (uniq) │       │  code (uniq) │       │  kind, quantity │     │
//! │  └──────────────┘       │  stock, min  │       │  before → after │     │
//! │                         └──────┬───────┘       └─────────────────┘     │
//! │                                │ 1                                      │
//! │                                │ *                                      │
//! │  ┌──────────────┐ 1   * ┌──────┴───────┐                               │
//! │  │   Customer   │───────│  Sale ─ Item │                               │
//! │  └──────────────┘       └──────────────┘                               │
//! │                                                                         │
//! │  RecordStatus: Active | Inactive  (soft delete, no way back)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business key where one exists (category name, product code, sale number)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::{margin_percent, Money};

/// Unit of measure applied when none is given ("unit").
pub const DEFAULT_UNIT: &str = "UN";

/// Generates a new entity ID (UUID v4).
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Record Status
// =============================================================================

/// Soft-delete state of a record.
///
/// ## State Machine
/// ```text
///   create ──► Active ──delete──► Inactive
///                                   │
///                                   └── delete again: stays Inactive
/// ```
/// There is no transition back to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

impl RecordStatus {
    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self, RecordStatus::Active)
    }

    /// Stored text form (matches the sqlx representation).
    pub const fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Active => "active",
            RecordStatus::Inactive => "inactive",
        }
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: String,
    /// Unique among active and inactive categories.
    pub name: String,
    pub description: Option<String>,
    pub status: RecordStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Builds a new active category. Inputs are expected to be validated.
    pub fn new(name: &str, description: Option<&str>) -> Self {
        Category {
            id: new_id(),
            name: name.trim().to_string(),
            description: normalize_optional(description),
            status: RecordStatus::Active,
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product kept in stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: String,

    /// Business code typed or scanned at the counter. Unique.
    pub code: String,

    pub name: String,

    pub description: Option<String>,

    /// Owning category, if any.
    pub category_id: Option<String>,

    /// Cost price in cents.
    pub cost_cents: i64,

    /// Sale price in cents.
    pub price_cents: i64,

    /// Units on hand. Never negative.
    pub current_stock: i64,

    /// Reorder threshold; at or below it the product is reported as low.
    pub minimum_stock: i64,

    /// Unit of measure ("UN", "KG", "L", ...).
    pub unit: String,

    pub status: RecordStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Profit margin of the sale price over the cost price, in percent.
    pub fn margin_percent(&self) -> f64 {
        margin_percent(self.cost(), self.price())
    }

    /// True when stock is at or below the minimum.
    #[inline]
    pub fn is_below_minimum(&self) -> bool {
        self.current_stock <= self.minimum_stock
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    /// National tax identifier (CPF/CNPJ, SSN, VAT number...). Unique when set.
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: RecordStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Builds a new active customer with only a name.
    pub fn new(name: &str) -> Self {
        Customer {
            id: new_id(),
            name: name.trim().to_string(),
            tax_id: None,
            email: None,
            phone: None,
            address: None,
            status: RecordStatus::Active,
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Sale Status / Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Sale has been paid and closed.
    #[default]
    Finalized,
    /// Sale was cancelled after being finalized.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    DebitCard,
    CreditCard,
    BankTransfer,
}

// =============================================================================
// Sale
// =============================================================================

/// A closed sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    /// Human-readable number printed on the receipt. Unique.
    pub sale_number: String,
    pub customer_id: Option<String>,
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
    /// Sum of item subtotals.
    pub total_cents: i64,
    pub discount_cents: i64,
    /// `total - discount`.
    pub final_cents: i64,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Builds a finalized sale from its items' total and a discount.
    pub fn new_finalized(
        sale_number: &str,
        customer_id: Option<&str>,
        total: Money,
        discount: Money,
        payment_method: PaymentMethod,
    ) -> Self {
        let now = Utc::now();
        Sale {
            id: new_id(),
            sale_number: sale_number.to_string(),
            customer_id: customer_id.map(str::to_string),
            sold_at: now,
            total_cents: total.cents(),
            discount_cents: discount.cents(),
            final_cents: (total - discount).cents(),
            payment_method,
            status: SaleStatus::Finalized,
            notes: None,
            created_at: now,
        }
    }

    #[inline]
    pub fn final_value(&self) -> Money {
        Money::from_cents(self.final_cents)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Unit price at time of sale (frozen).
    pub unit_price_cents: i64,
    /// `unit_price × quantity`.
    pub subtotal_cents: i64,
}

impl SaleItem {
    pub fn new(sale_id: &str, product_id: &str, quantity: i64, unit_price: Money) -> Self {
        SaleItem {
            id: new_id(),
            sale_id: sale_id.to_string(),
            product_id: product_id.to_string(),
            quantity,
            unit_price_cents: unit_price.cents(),
            subtotal_cents: unit_price.multiply_quantity(quantity).cents(),
        }
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Goods received.
    Entry,
    /// Goods leaving (sale, loss, consumption).
    Exit,
    /// Correction after a count; may go either way.
    Adjustment,
}

/// One immutable line of a product's stock ledger.
///
/// `quantity` is always the magnitude of the change; the direction is read
/// from `kind` or from comparing `stock_before` and `stock_after`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockMovement {
    pub id: String,
    pub product_id: String,
    pub kind: MovementKind,
    pub quantity: i64,
    pub stock_before: i64,
    pub stock_after: i64,
    pub reason: String,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    /// Signed change this movement applied (`after - before`).
    #[inline]
    pub fn delta(&self) -> i64 {
        self.stock_after - self.stock_before
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Trims an optional text field, mapping blank to `None`.
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Unit Tests
// =============================================================================
