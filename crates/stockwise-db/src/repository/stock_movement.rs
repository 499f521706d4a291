//! # Stock Movement Repository
//!
//! The stock ledger: one immutable row per change of a product's stock.
//! Rows are only ever inserted, never updated or deleted.

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use stockwise_core::StockMovement;

const MOVEMENT_COLUMNS: &str = r#"
    id, product_id, kind, quantity, stock_before, stock_after,
    reason, notes, created_at
"#;

/// Repository for the stock movement ledger.
#[derive(Debug, Clone)]
pub struct StockMovementRepository {
    pool: SqlitePool,
}

impl StockMovementRepository {
    /// Creates a new StockMovementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockMovementRepository { pool }
    }

    /// Appends a movement to the ledger.
    ///
    /// Normally called inside the same transaction that changed the stock.
    pub async fn insert<'e, E>(&self, executor: E, movement: &StockMovement) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!(
            product_id = %movement.product_id,
            before = movement.stock_before,
            after = movement.stock_after,
            "Recording stock movement"
        );

        sqlx::query(
            r#"
            INSERT INTO stock_movements (
                id, product_id, kind, quantity, stock_before, stock_after,
                reason, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&movement.id)
        .bind(&movement.product_id)
        .bind(movement.kind)
        .bind(movement.quantity)
        .bind(movement.stock_before)
        .bind(movement.stock_after)
        .bind(&movement.reason)
        .bind(&movement.notes)
        .bind(movement.created_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// The ledger of one product, newest first.
    ///
    /// Rows written within the same clock tick keep insertion order
    /// through the `rowid` tie-break.
    pub async fn list_for_product(&self, product_id: &str) -> DbResult<Vec<StockMovement>> {
        let sql = format!(
            r#"
            SELECT {MOVEMENT_COLUMNS} FROM stock_movements
            WHERE product_id = ?1
            ORDER BY created_at DESC, rowid DESC
            "#
        );

        let movements = sqlx::query_as::<_, StockMovement>(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(movements)
    }

    /// Most recent movement of a product, if any.
    pub async fn latest_for_product(&self, product_id: &str) -> DbResult<Option<StockMovement>> {
        let sql = format!(
            r#"
            SELECT {MOVEMENT_COLUMNS} FROM stock_movements
            WHERE product_id = ?1
            ORDER BY created_at DESC, rowid DESC
            LIMIT 1
            "#
        );

        let movement = sqlx::query_as::<_, StockMovement>(&sql)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(movement)
    }

    /// Number of ledger rows for a product.
    pub async fn count_for_product(&self, product_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements WHERE product_id = ?1")
                .bind(product_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::{Database, DbConfig};
    use stockwise_core::{new_id, MovementKind, Product, RecordStatus, StockChange};

    async fn db_with_product() -> (Database, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let product = Product {
            id: new_id(),
            code: "001".to_string(),
            name: "Rice 5kg".to_string(),
            description: None,
            category_id: None,
            cost_cents: 1500,
            price_cents: 2250,
            current_stock: 0,
            minimum_stock: 10,
            unit: "UN".to_string(),
            status: RecordStatus::Active,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(db.pool(), &product).await.unwrap();
        (db, product)
    }

    #[tokio::test]
    async fn test_ledger_newest_first() {
        let (db, product) = db_with_product().await;
        let repo = db.movements();
        let at = Utc::now();

        // Same timestamp on purpose: ordering falls back to insertion order
        let first = StockChange::plan(0, 50)
            .unwrap()
            .into_movement(&product.id, MovementKind::Entry, "Initial stock", None, at);
        let second = StockChange::plan(50, -10)
            .unwrap()
            .into_movement(&product.id, MovementKind::Exit, "sale", Some("counter"), at);

        repo.insert(db.pool(), &first).await.unwrap();
        repo.insert(db.pool(), &second).await.unwrap();

        let ledger = repo.list_for_product(&product.id).await.unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger[0].id, second.id);
        assert_eq!(ledger[0].kind, MovementKind::Exit);
        assert_eq!(ledger[0].quantity, 10);
        assert_eq!((ledger[0].stock_before, ledger[0].stock_after), (50, 40));
        assert_eq!(ledger[0].notes.as_deref(), Some("counter"));
        assert_eq!(ledger[1].id, first.id);

        let latest = repo.latest_for_product(&product.id).await.unwrap().unwrap();
        assert_eq!(latest.id, second.id);
        assert_eq!(repo.count_for_product(&product.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_ledger() {
        let (db, product) = db_with_product().await;

        assert!(db.movements().list_for_product(&product.id).await.unwrap().is_empty());
        assert!(db.movements().latest_for_product(&product.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_movement_for_unknown_product_rejected() {
        let (db, _) = db_with_product().await;

        let movement = StockChange::plan(0, 1)
            .unwrap()
            .into_movement(&new_id(), MovementKind::Entry, "x", None, Utc::now());

        assert!(db.movements().insert(db.pool(), &movement).await.is_err());
    }
}
