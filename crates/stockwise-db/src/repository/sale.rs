//! # Sale Repository
//!
//! Database operations for sales and sale items.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. RECORD                                                             │
//! │     └── insert_sale() → Sale { status: Finalized }                     │
//! │     └── add_item()    → SaleItem (price frozen at time of sale)        │
//! │                                                                         │
//! │  2. (OPTIONAL) CANCEL                                                  │
//! │     └── cancel()      → Sale { status: Cancelled }                     │
//! │                         only from Finalized, never back                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockwise_core::{Sale, SaleItem};

const SALE_COLUMNS: &str = r#"
    id, sale_number, customer_id, sold_at,
    total_cents, discount_cents, final_cents,
    payment_method, status, notes, created_at
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");

        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Gets a sale by the number printed on its receipt.
    pub async fn get_by_number(&self, sale_number: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE sale_number = ?1");

        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(sale_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Inserts a sale header.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Sale number already used
    pub async fn insert_sale<'e, E>(&self, executor: E, sale: &Sale) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!(id = %sale.id, sale_number = %sale.sale_number, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, sale_number, customer_id, sold_at,
                total_cents, discount_cents, final_cents,
                payment_method, status, notes, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7,
                ?8, ?9, ?10, ?11
            )
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.sale_number)
        .bind(&sale.customer_id)
        .bind(sale.sold_at)
        .bind(sale.total_cents)
        .bind(sale.discount_cents)
        .bind(sale.final_cents)
        .bind(sale.payment_method)
        .bind(sale.status)
        .bind(&sale.notes)
        .bind(sale.created_at)
        .execute(executor)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &sale.sale_number),
            other => other,
        })?;

        Ok(())
    }

    /// Adds an item to a sale.
    ///
    /// The unit price is a snapshot: later price changes on the product do
    /// not alter recorded sales.
    pub async fn add_item<'e, E>(&self, executor: E, item: &SaleItem) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!(sale_id = %item.sale_id, product_id = %item.product_id, "Adding sale item");

        sqlx::query(
            r#"
            INSERT INTO sale_items (
                id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&item.id)
        .bind(&item.sale_id)
        .bind(&item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(item.subtotal_cents)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Gets all items for a sale, in the order they were added.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Cancels a finalized sale.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No finalized sale with that ID
    pub async fn cancel(&self, sale_id: &str) -> DbResult<()> {
        debug!(id = %sale_id, "Cancelling sale");

        let result = sqlx::query(
            "UPDATE sales SET status = 'cancelled' WHERE id = ?1 AND status = 'finalized'",
        )
        .bind(sale_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale (finalized)", sale_id));
        }

        Ok(())
    }

    /// Counts sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
