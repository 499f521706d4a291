//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Lookups by id and by business code
//! - Listing, text search, low-stock report
//! - Inserts and partial updates
//! - Compare-and-swap stock writes
//!
//! ## Stock Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Compare-and-Swap Stock Update                        │
//! │                                                                         │
//! │  read product           current_stock = 50                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  plan change            50 + (-10) = 40                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE products SET current_stock = 40                                │
//! │   WHERE id = ? AND current_stock = 50                                  │
//! │       │                                                                 │
//! │       ├── 1 row  → stock is 40, write the ledger entry                 │
//! │       │                                                                 │
//! │       └── 0 rows → someone else moved the stock first                  │
//! │                     DbError::StaleWrite, caller re-reads and retries   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `current_stock` is never touched by [`ProductRepository::update`]; the
//! stock only moves together with a ledger entry.

use chrono::{DateTime, Utc};
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockwise_core::{Product, RecordStatus};

const PRODUCT_COLUMNS: &str = r#"
    id, code, name, description, category_id,
    cost_cents, price_cents, current_stock, minimum_stock,
    unit, status, created_at, updated_at
"#;

/// Columns of a product to overwrite. `None` leaves a column as stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    /// `Some(None)` detaches the product from its category.
    pub category_id: Option<Option<String>>,
    pub cost_cents: Option<i64>,
    pub price_cents: Option<i64>,
    pub minimum_stock: Option<i64>,
    pub unit: Option<String>,
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let rice = repo.get_by_code("001").await?;
/// let low = repo.list_below_minimum().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        self.fetch_by_id(&self.pool, id).await
    }

    /// Gets a product by its ID through any executor (pool or transaction).
    pub async fn fetch_by_id<'e, E>(&self, executor: E, id: &str) -> DbResult<Option<Product>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(product)
    }

    /// Gets a product by its business code, active or inactive.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE code = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists products ordered by name.
    pub async fn list(&self, active_only: bool) -> DbResult<Vec<Product>> {
        let sql = if active_only {
            format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE status = 'active' ORDER BY name")
        } else {
            format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name")
        };

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), active_only, "Listed products");
        Ok(products)
    }

    /// Searches active products whose name or code contains `query`,
    /// ignoring case.
    ///
    /// Case is folded with Rust's Unicode-aware `to_lowercase`: SQLite's
    /// `lower()` only folds ASCII, so "FEIJÃO" would miss "Feijão 1kg".
    /// The match is a plain substring test, `%` and `_` match literally.
    ///
    /// ## Example
    /// ```rust,ignore
    /// // "rice" finds "Rice 5kg" and "Brown rice"
    /// let products = repo.search("rice").await?;
    /// ```
    pub async fn search(&self, query: &str) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, "Searching products");

        let active = self.list(true).await?;
        if query.is_empty() {
            return Ok(active);
        }

        let needle = query.to_lowercase();
        let products: Vec<Product> = active
            .into_iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle) || p.code.to_lowercase().contains(&needle)
            })
            .collect();

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Active products at or below their minimum stock, ordered by name.
    pub async fn list_below_minimum(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE status = 'active' AND current_stock <= minimum_stock
            ORDER BY name
            "#
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Code already exists
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown category id
    pub async fn insert<'e, E>(&self, executor: E, product: &Product) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!(code = %product.code, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, code, name, description, category_id,
                cost_cents, price_cents, current_stock, minimum_stock,
                unit, status, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9,
                ?10, ?11, ?12, ?13
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.code)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category_id)
        .bind(product.cost_cents)
        .bind(product.price_cents)
        .bind(product.current_stock)
        .bind(product.minimum_stock)
        .bind(&product.unit)
        .bind(product.status)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(executor)
        .await
        .map_err(|e| code_conflict(e, &product.code))?;

        Ok(())
    }

    /// Writes the supplied fields of an existing product and stamps
    /// `updated_at`.
    ///
    /// Only columns present in `changes` appear in the `SET` list, so a
    /// concurrent edit of another field is kept. Stock level and status
    /// are never written here.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No product with that id
    /// * `Err(DbError::UniqueViolation)` - New code already taken
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown category id
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: &str,
        changes: &ProductUpdate,
        at: DateTime<Utc>,
    ) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!(id = %id, ?changes, "Updating product");

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE products SET updated_at = ");
        builder.push_bind(at);

        if let Some(code) = &changes.code {
            builder.push(", code = ").push_bind(code.clone());
        }
        if let Some(name) = &changes.name {
            builder.push(", name = ").push_bind(name.clone());
        }
        if let Some(description) = &changes.description {
            builder.push(", description = ").push_bind(description.clone());
        }
        if let Some(category_id) = &changes.category_id {
            builder.push(", category_id = ").push_bind(category_id.clone());
        }
        if let Some(cost_cents) = changes.cost_cents {
            builder.push(", cost_cents = ").push_bind(cost_cents);
        }
        if let Some(price_cents) = changes.price_cents {
            builder.push(", price_cents = ").push_bind(price_cents);
        }
        if let Some(minimum_stock) = changes.minimum_stock {
            builder.push(", minimum_stock = ").push_bind(minimum_stock);
        }
        if let Some(unit) = &changes.unit {
            builder.push(", unit = ").push_bind(unit.clone());
        }

        builder.push(" WHERE id = ").push_bind(id.to_string());

        let result = builder
            .build()
            .execute(executor)
            .await
            .map_err(|e| code_conflict(e, changes.code.as_deref().unwrap_or(id)))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Sets the stock to `new_stock` only if it still equals `expected`.
    ///
    /// ## Returns
    /// * `Ok(())` - Stock written, `updated_at` stamped
    /// * `Err(DbError::StaleWrite)` - Product missing or stock changed since it was read
    /// * `Err(DbError::CheckViolation)` - `new_stock` is negative
    pub async fn compare_and_set_stock<'e, E>(
        &self,
        executor: E,
        id: &str,
        expected: i64,
        new_stock: i64,
        at: DateTime<Utc>,
    ) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!(id = %id, expected, new_stock, "Writing stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET current_stock = ?3, updated_at = ?4
            WHERE id = ?1 AND current_stock = ?2
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(new_stock)
        .bind(at)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::stale("Product", id));
        }

        Ok(())
    }

    /// Sets the status of a product (soft delete when `Inactive`).
    pub async fn set_status(&self, id: &str, status: RecordStatus, at: DateTime<Utc>) -> DbResult<()> {
        debug!(id = %id, status = status.as_str(), "Setting product status");

        let result = sqlx::query("UPDATE products SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products of a category, active and inactive alike.
    pub async fn count_in_category(&self, category_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = ?1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self, active_only: bool) -> DbResult<i64> {
        let sql = if active_only {
            "SELECT COUNT(*) FROM products WHERE status = 'active'"
        } else {
            "SELECT COUNT(*) FROM products"
        };

        let count: i64 = sqlx::query_scalar(sql).fetch_one(&self.pool).await?;
        Ok(count)
    }
}

fn code_conflict(err: sqlx::Error, code: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { field, .. } => DbError::duplicate(field, code),
        other => other,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
