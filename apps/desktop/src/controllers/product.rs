//! # Product Controller
//!
//! Product registration, editing, soft delete and stock adjustment.
//!
//! ## Stock Adjustment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    adjust_stock(id, -10, Exit, "Sale")                  │
//! │                                                                         │
//! │  validate reason                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────── attempt (at most 3) ────────────────────────┐   │
//! │  │  BEGIN                                                          │   │
//! │  │  read product                 ──► missing ───────► NotFound     │   │
//! │  │  StockChange::plan(50, -10)   ──► below zero ────► Conflict     │   │
//! │  │  UPDATE ... WHERE current_stock = 50                            │   │
//! │  │       └── 0 rows / locked ──► ROLLBACK, next attempt            │   │
//! │  │  INSERT stock_movements (Exit, 10, 50 → 40)                     │   │
//! │  │  COMMIT                                                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ok(StockAdjustment { product, movement })                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A rejected adjustment leaves both the product and its ledger untouched:
//! the transaction is dropped before anything is committed.

use chrono::Utc;
use serde::Serialize;
use stockwise_core::stock::{INITIAL_STOCK_NOTES, INITIAL_STOCK_REASON};
use stockwise_core::validation::{
    validate_code, validate_price, validate_product_name, validate_reason, validate_search_query,
    validate_stock_level, validate_unit,
};
use stockwise_core::{
    new_id, normalize_optional, CoreError, Money, MovementKind, Product, RecordStatus,
    StockChange, StockMovement,
};
use stockwise_db::{commit, Database, DbError, ProductUpdate};
use tracing::{debug, error, info, warn};

use crate::error::{OpError, OpResult};

/// Attempts made by [`ProductController::adjust_stock`] before a concurrent
/// change is reported as a conflict.
pub const MAX_STOCK_RETRIES: u32 = 3;

// =============================================================================
// Inputs and Outputs
// =============================================================================

/// Fields of a product being registered.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub cost_price: Money,
    pub sale_price: Money,
    /// Units on hand at registration. Recorded as an entry movement when > 0.
    pub initial_stock: i64,
    pub minimum_stock: i64,
    /// Defaults to "UN" when absent or blank.
    pub unit: Option<String>,
}

/// Partial update of a product. `None` leaves a field as is.
///
/// Stock is changed only through [`ProductController::adjust_stock`].
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub code: Option<String>,
    pub name: Option<String>,
    /// A blank description clears it.
    pub description: Option<String>,
    /// `Some(None)` detaches the product from its category.
    pub category_id: Option<Option<String>>,
    pub cost_price: Option<Money>,
    pub sale_price: Option<Money>,
    pub minimum_stock: Option<i64>,
    pub unit: Option<String>,
}

/// Result of a successful stock adjustment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    /// The product with its new stock level.
    pub product: Product,
    /// The ledger entry written for the change.
    pub movement: StockMovement,
}

/// Outcome of one failed adjustment attempt.
enum AttemptError {
    /// Stock changed underneath us or the database was locked; try again.
    Retry(DbError),
    Failed(OpError),
}

impl From<DbError> for AttemptError {
    fn from(err: DbError) -> Self {
        if err.is_retryable() {
            AttemptError::Retry(err)
        } else {
            AttemptError::Failed(err.into())
        }
    }
}

impl From<CoreError> for AttemptError {
    fn from(err: CoreError) -> Self {
        AttemptError::Failed(err.into())
    }
}

impl From<OpError> for AttemptError {
    fn from(err: OpError) -> Self {
        AttemptError::Failed(err)
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Product operations used by the presentation layer.
#[derive(Debug, Clone)]
pub struct ProductController {
    db: Database,
}

impl ProductController {
    pub fn new(db: Database) -> Self {
        ProductController { db }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lists products ordered by name. Store failures yield an empty list.
    pub async fn list(&self, active_only: bool) -> Vec<Product> {
        self.db.products().list(active_only).await.unwrap_or_else(|e| {
            error!(error = %e, "Failed to list products");
            Vec::new()
        })
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Product> {
        self.db.products().get_by_id(id).await.unwrap_or_else(|e| {
            error!(id = %id, error = %e, "Failed to load product");
            None
        })
    }

    /// Finds a product by its exact (trimmed) code, active or not.
    pub async fn find_by_code(&self, code: &str) -> Option<Product> {
        self.db
            .products()
            .get_by_code(code.trim())
            .await
            .unwrap_or_else(|e| {
                error!(code = %code, error = %e, "Failed to load product by code");
                None
            })
    }

    /// Active products whose name or code contains `text`, ignoring case.
    ///
    /// Blank text lists every active product.
    pub async fn search(&self, text: &str) -> Vec<Product> {
        let query = match validate_search_query(text) {
            Ok(query) => query,
            Err(e) => {
                warn!(error = %e, "Rejected product search");
                return Vec::new();
            }
        };

        self.db.products().search(&query).await.unwrap_or_else(|e| {
            error!(query = %query, error = %e, "Product search failed");
            Vec::new()
        })
    }

    /// Active products at or below their minimum stock, ordered by name.
    pub async fn list_below_minimum(&self) -> Vec<Product> {
        self.db
            .products()
            .list_below_minimum()
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "Failed to list low-stock products");
                Vec::new()
            })
    }

    /// Stock ledger of a product, newest first.
    pub async fn movements(&self, product_id: &str) -> Vec<StockMovement> {
        self.db
            .movements()
            .list_for_product(product_id)
            .await
            .unwrap_or_else(|e| {
                error!(product_id = %product_id, error = %e, "Failed to list stock movements");
                Vec::new()
            })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Registers a product, recording its initial stock in the ledger.
    ///
    /// ## Errors
    /// - `Validation` - code or name blank, negative price or stock figure
    /// - `Duplicate` - the code is already registered
    /// - `NotFound` - the category does not exist
    ///
    /// The product row and its initial movement commit together.
    pub async fn create(&self, input: NewProduct) -> OpResult<Product> {
        let code = validate_code(&input.code)?;
        let name = validate_product_name(&input.name)?;

        if self.db.products().get_by_code(&code).await?.is_some() {
            warn!(code = %code, "Rejected duplicate product code");
            return Err(OpError::duplicate(format!(
                "A product with code '{}' already exists",
                code
            )));
        }

        validate_price("cost price", input.cost_price)?;
        validate_price("sale price", input.sale_price)?;
        validate_stock_level("initial stock", input.initial_stock)?;
        validate_stock_level("minimum stock", input.minimum_stock)?;
        let unit = validate_unit(input.unit.as_deref())?;

        let category_id = normalize_optional(input.category_id.as_deref());
        if let Some(category_id) = &category_id {
            self.require_category(category_id).await?;
        }

        let now = Utc::now();
        let product = Product {
            id: new_id(),
            code,
            name,
            description: normalize_optional(input.description.as_deref()),
            category_id,
            cost_cents: input.cost_price.cents(),
            price_cents: input.sale_price.cents(),
            current_stock: input.initial_stock,
            minimum_stock: input.minimum_stock,
            unit,
            status: RecordStatus::Active,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.db.begin().await?;
        self.db.products().insert(&mut *tx, &product).await?;

        if let Some(change) = StockChange::initial(product.current_stock) {
            let movement = change.into_movement(
                &product.id,
                MovementKind::Entry,
                INITIAL_STOCK_REASON,
                Some(INITIAL_STOCK_NOTES),
                now,
            );
            self.db.movements().insert(&mut *tx, &movement).await?;
        }

        commit(tx).await?;

        info!(
            id = %product.id,
            code = %product.code,
            stock = product.current_stock,
            "Product created"
        );
        Ok(product)
    }

    /// Applies the supplied changes to a product and stamps `updated_at`.
    ///
    /// Only supplied fields are written; the returned product is re-read
    /// after the write.
    ///
    /// ## Errors
    /// - `NotFound` - no such product, or the new category does not exist
    /// - `Validation` - supplied code or name blank, negative price or minimum
    /// - `Duplicate` - supplied code belongs to another product
    pub async fn update(&self, id: &str, changes: ProductChanges) -> OpResult<Product> {
        let current = self
            .db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| OpError::not_found("Product", id))?;

        let mut update = ProductUpdate::default();

        if let Some(code) = changes.code.as_deref() {
            let code = validate_code(code)?;

            if code != current.code {
                if let Some(other) = self.db.products().get_by_code(&code).await? {
                    if other.id != current.id {
                        warn!(id = %id, code = %code, "Rejected product code change to a taken code");
                        return Err(OpError::duplicate(format!(
                            "Another product already uses code '{}'",
                            code
                        )));
                    }
                }
            }

            update.code = Some(code);
        }

        if let Some(name) = changes.name.as_deref() {
            update.name = Some(validate_product_name(name)?);
        }

        if let Some(description) = changes.description.as_deref() {
            update.description = Some(normalize_optional(Some(description)));
        }

        if let Some(category_id) = changes.category_id {
            let category_id = normalize_optional(category_id.as_deref());
            if let Some(category_id) = &category_id {
                self.require_category(category_id).await?;
            }
            update.category_id = Some(category_id);
        }

        if let Some(cost) = changes.cost_price {
            validate_price("cost price", cost)?;
            update.cost_cents = Some(cost.cents());
        }

        if let Some(sale) = changes.sale_price {
            validate_price("sale price", sale)?;
            update.price_cents = Some(sale.cents());
        }

        if let Some(minimum) = changes.minimum_stock {
            validate_stock_level("minimum stock", minimum)?;
            update.minimum_stock = Some(minimum);
        }

        if let Some(unit) = changes.unit.as_deref() {
            update.unit = Some(validate_unit(Some(unit))?);
        }

        self.db
            .products()
            .update(self.db.pool(), id, &update, Utc::now())
            .await?;

        let product = self
            .db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| OpError::not_found("Product", id))?;

        info!(id = %product.id, code = %product.code, "Product updated");
        Ok(product)
    }

    /// Soft-deletes a product. Deleting an inactive product succeeds again.
    ///
    /// ## Errors
    /// - `NotFound` - no product with that id
    pub async fn delete(&self, id: &str) -> OpResult<Product> {
        let mut product = self
            .db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| OpError::not_found("Product", id))?;

        let now = Utc::now();
        self.db
            .products()
            .set_status(id, RecordStatus::Inactive, now)
            .await?;

        product.status = RecordStatus::Inactive;
        product.updated_at = now;

        info!(id = %id, code = %product.code, "Product deleted");
        Ok(product)
    }

    /// Changes the stock of a product by `delta` and records the movement.
    ///
    /// ## Arguments
    /// * `delta` - Signed change; the movement stores its magnitude
    /// * `kind` - Entry, exit or adjustment, as chosen by the caller
    /// * `reason` - Required, e.g. "Sale" or "Inventory count"
    ///
    /// ## Errors
    /// - `Validation` - blank reason
    /// - `NotFound` - no product with that id
    /// - `Conflict` - the stock would go negative, or it kept changing
    ///   concurrently for [`MAX_STOCK_RETRIES`] attempts
    pub async fn adjust_stock(
        &self,
        id: &str,
        delta: i64,
        kind: MovementKind,
        reason: &str,
        notes: Option<&str>,
    ) -> OpResult<StockAdjustment> {
        let reason = validate_reason(reason)?;

        for attempt in 1..=MAX_STOCK_RETRIES {
            match self.try_adjust(id, delta, kind, &reason, notes).await {
                Ok(adjustment) => {
                    info!(
                        id = %id,
                        before = adjustment.movement.stock_before,
                        after = adjustment.movement.stock_after,
                        kind = ?kind,
                        "Stock adjusted"
                    );
                    return Ok(adjustment);
                }
                Err(AttemptError::Retry(e)) => {
                    debug!(id = %id, attempt, error = %e, "Stock write lost a race, retrying");
                }
                Err(AttemptError::Failed(e)) => return Err(e),
            }
        }

        warn!(id = %id, attempts = MAX_STOCK_RETRIES, "Giving up on contended stock adjustment");
        Err(OpError::conflict(format!(
            "Stock of product {} kept changing, please retry",
            id
        )))
    }

    /// One read-plan-write pass of [`Self::adjust_stock`] in its own transaction.
    async fn try_adjust(
        &self,
        id: &str,
        delta: i64,
        kind: MovementKind,
        reason: &str,
        notes: Option<&str>,
    ) -> Result<StockAdjustment, AttemptError> {
        let products = self.db.products();
        let mut tx = self.db.begin().await?;

        let mut product = products
            .fetch_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| OpError::not_found("Product", id))?;

        let change = StockChange::plan(product.current_stock, delta).map_err(|e| {
            warn!(id = %id, current = product.current_stock, delta, "Rejected stock adjustment");
            e
        })?;

        let now = Utc::now();
        products
            .compare_and_set_stock(&mut *tx, id, change.before, change.after, now)
            .await?;

        let movement = change.into_movement(id, kind, reason, notes, now);
        self.db.movements().insert(&mut *tx, &movement).await?;

        commit(tx).await?;

        product.current_stock = change.after;
        product.updated_at = now;
        Ok(StockAdjustment { product, movement })
    }

    /// Profit margin of `sale` over `cost` in percent, two decimals.
    ///
    /// Zero when the cost is zero or negative.
    pub fn margin_percent(cost: Money, sale: Money) -> f64 {
        stockwise_core::margin_percent(cost, sale)
    }

    async fn require_category(&self, category_id: &str) -> OpResult<()> {
        match self.db.categories().get_by_id(category_id).await? {
            Some(_) => Ok(()),
            None => Err(OpError::not_found("Category", category_id)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::category::CategoryController;
    use crate::error::ErrorKind;
    use stockwise_db::DbConfig;

    async fn controller() -> ProductController {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        ProductController::new(db)
    }

    fn rice(initial_stock: i64) -> NewProduct {
        NewProduct {
            code: "001".to_string(),
            name: "Rice 5kg".to_string(),
            cost_price: Money::parse("15.00").unwrap(),
            sale_price: Money::parse("22.50").unwrap(),
            initial_stock,
            minimum_stock: 10,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_with_initial_stock_writes_one_entry() {
        let products = controller().await;

        let product = products.create(rice(50)).await.unwrap();
        assert_eq!(product.current_stock, 50);
        assert_eq!(product.unit, "UN");
        assert_eq!(product.status, RecordStatus::Active);

        let movements = products.movements(&product.id).await;
        assert_eq!(movements.len(), 1);

        let entry = &movements[0];
        assert_eq!(entry.kind, MovementKind::Entry);
        assert_eq!(entry.quantity, 50);
        assert_eq!((entry.stock_before, entry.stock_after), (0, 50));
        assert_eq!(entry.reason, INITIAL_STOCK_REASON);
    }

    #[tokio::test]
    async fn test_create_without_stock_writes_no_movement() {
        let products = controller().await;

        let product = products.create(rice(0)).await.unwrap();
        assert_eq!(product.current_stock, 0);
        assert!(products.movements(&product.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_create_validation() {
        let products = controller().await;

        let blank_code = NewProduct {
            code: "  ".to_string(),
            ..rice(0)
        };
        let err = products.create(blank_code).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let blank_name = NewProduct {
            name: String::new(),
            ..rice(0)
        };
        let err = products.create(blank_name).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let negative_cost = NewProduct {
            cost_price: Money::from_cents(-1),
            ..rice(0)
        };
        let err = products.create(negative_cost).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let negative_sale = NewProduct {
            sale_price: Money::from_cents(-1),
            ..rice(0)
        };
        let err = products.create(negative_sale).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let unknown_category = NewProduct {
            category_id: Some("missing".to_string()),
            ..rice(0)
        };
        let err = products.create(unknown_category).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        assert!(products.list(false).await.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_code_is_rejected() {
        let products = controller().await;
        products.create(rice(50)).await.unwrap();

        let err = products
            .create(NewProduct {
                name: "Other rice".to_string(),
                ..rice(5)
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Duplicate);
        assert_eq!(products.list(false).await.len(), 1);
    }

    #[tokio::test]
    async fn test_adjust_below_zero_is_rejected_and_changes_nothing() {
        let products = controller().await;
        let product = products.create(rice(50)).await.unwrap();

        let err = products
            .adjust_stock(&product.id, -60, MovementKind::Exit, "sale", None)
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(err.message.contains("cannot go negative"));

        let reloaded = products.find_by_id(&product.id).await.unwrap();
        assert_eq!(reloaded.current_stock, 50);
        assert_eq!(products.movements(&product.id).await.len(), 1);
    }

    async fn break_stock_ledger(products: &ProductController) {
        sqlx::query(
            "CREATE TRIGGER fail_movements BEFORE INSERT ON stock_movements \
             BEGIN SELECT RAISE(ABORT, 'ledger unavailable'); END",
        )
        .execute(products.db.pool())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_create_rolls_back_when_ledger_write_fails() {
        let products = controller().await;
        break_stock_ledger(&products).await;

        let err = products.create(rice(50)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Store);

        assert!(products.find_by_code("001").await.is_none());
        assert!(products.list(false).await.is_empty());
    }

    #[tokio::test]
    async fn test_adjust_rolls_back_when_ledger_write_fails() {
        let products = controller().await;
        let product = products.create(rice(50)).await.unwrap();
        break_stock_ledger(&products).await;

        let err = products
            .adjust_stock(&product.id, -10, MovementKind::Exit, "Sale", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Store);

        let reloaded = products.find_by_id(&product.id).await.unwrap();
        assert_eq!(reloaded.current_stock, 50);
        assert_eq!(products.movements(&product.id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_adjust_records_magnitude_and_snapshots() {
        let products = controller().await;
        let product = products.create(rice(50)).await.unwrap();

        let exit = products
            .adjust_stock(&product.id, -10, MovementKind::Exit, " Sale ", Some("Counter 2"))
            .await
            .unwrap();

        assert_eq!(exit.product.current_stock, 40);
        assert_eq!(exit.movement.quantity, 10);
        assert_eq!((exit.movement.stock_before, exit.movement.stock_after), (50, 40));
        assert_eq!(exit.movement.reason, "Sale");
        assert_eq!(exit.movement.notes.as_deref(), Some("Counter 2"));

        let recount = products
            .adjust_stock(&product.id, 5, MovementKind::Adjustment, "Inventory count", None)
            .await
            .unwrap();
        assert_eq!(recount.product.current_stock, 45);
        assert_eq!(recount.movement.quantity, 5);

        let newest = products.movements(&product.id).await;
        assert_eq!(newest.len(), 3);
        assert_eq!(newest[0].id, recount.movement.id);
    }

    #[tokio::test]
    async fn test_adjust_errors() {
        let products = controller().await;
        let product = products.create(rice(5)).await.unwrap();

        let err = products
            .adjust_stock("missing", 1, MovementKind::Entry, "Purchase", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = products
            .adjust_stock(&product.id, 1, MovementKind::Entry, "  ", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_stock_never_negative_and_ledger_matches() {
        let products = controller().await;
        let product = products.create(rice(20)).await.unwrap();

        let deltas = [-5, -20, 7, -22, -1, 30, -30, 0, -3];
        let mut expected = 20;
        let mut movements = 1;

        for delta in deltas {
            let result = products
                .adjust_stock(&product.id, delta, MovementKind::Adjustment, "Recount", None)
                .await;

            if expected + delta < 0 {
                assert_eq!(result.unwrap_err().kind, ErrorKind::Conflict);
            } else {
                let adjustment = result.unwrap();
                assert_eq!(adjustment.movement.stock_before, expected);
                expected += delta;
                movements += 1;
                assert_eq!(adjustment.movement.stock_after, expected);
            }

            let current = products.find_by_id(&product.id).await.unwrap().current_stock;
            assert!(current >= 0);
            assert_eq!(current, expected);

            let ledger = products.movements(&product.id).await;
            assert_eq!(ledger.len(), movements);
            assert_eq!(ledger[0].stock_after, current);
        }
    }

    #[tokio::test]
    async fn test_update_partial_fields() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let categories = CategoryController::new(db.clone());
        let products = ProductController::new(db);

        let food = categories.create("Food", None).await.unwrap();
        let product = products.create(rice(50)).await.unwrap();

        let updated = products
            .update(
                &product.id,
                ProductChanges {
                    name: Some(" Rice 1kg ".to_string()),
                    category_id: Some(Some(food.id.clone())),
                    sale_price: Some(Money::from_cents(2400)),
                    unit: Some("kg".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Rice 1kg");
        assert_eq!(updated.code, "001");
        assert_eq!(updated.category_id.as_deref(), Some(food.id.as_str()));
        assert_eq!(updated.cost_cents, 1500);
        assert_eq!(updated.price_cents, 2400);
        assert_eq!(updated.current_stock, 50);
        assert!(updated.updated_at >= product.updated_at);

        let detached = products
            .update(
                &product.id,
                ProductChanges {
                    category_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(detached.category_id, None);

        let reloaded = products.find_by_code("001").await.unwrap();
        assert_eq!(reloaded.name, "Rice 1kg");
        assert_eq!(reloaded.unit, "kg");
        assert_eq!(reloaded.category_id, None);
    }

    #[tokio::test]
    async fn test_update_errors() {
        let products = controller().await;
        let product = products.create(rice(0)).await.unwrap();
        products
            .create(NewProduct {
                code: "002".to_string(),
                name: "Beans 1kg".to_string(),
                ..rice(0)
            })
            .await
            .unwrap();

        let err = products
            .update("missing", ProductChanges::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = products
            .update(
                &product.id,
                ProductChanges {
                    code: Some("002".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Duplicate);

        let err = products
            .update(
                &product.id,
                ProductChanges {
                    name: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = products
            .update(
                &product.id,
                ProductChanges {
                    cost_price: Some(Money::from_cents(-100)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let unchanged = products.find_by_id(&product.id).await.unwrap();
        assert_eq!(unchanged.code, "001");
        assert_eq!(unchanged.cost_cents, 1500);
    }

    #[tokio::test]
    async fn test_update_keeps_concurrent_edits_to_other_fields() {
        let products = controller().await;
        let product = products.create(rice(50)).await.unwrap();

        // Another window renames the product after this one loaded it.
        sqlx::query("UPDATE products SET name = 'Rice 1kg' WHERE id = ?")
            .bind(&product.id)
            .execute(products.db.pool())
            .await
            .unwrap();

        let updated = products
            .update(
                &product.id,
                ProductChanges {
                    sale_price: Some(Money::from_cents(2600)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Rice 1kg");
        assert_eq!(updated.price_cents, 2600);
        assert_eq!(updated.cost_cents, 1500);
        assert_eq!(updated.current_stock, 50);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let products = controller().await;
        let product = products.create(rice(50)).await.unwrap();

        let first = products.delete(&product.id).await.unwrap();
        assert_eq!(first.status, RecordStatus::Inactive);

        let second = products.delete(&product.id).await.unwrap();
        assert_eq!(second.status, RecordStatus::Inactive);

        assert!(products.list(true).await.is_empty());
        assert_eq!(products.list(false).await.len(), 1);

        let err = products.delete("missing").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_search_and_low_stock() {
        let products = controller().await;
        products.create(rice(5)).await.unwrap();
        let beans = products
            .create(NewProduct {
                code: "002".to_string(),
                name: "Beans 1kg".to_string(),
                initial_stock: 30,
                minimum_stock: 5,
                ..rice(0)
            })
            .await
            .unwrap();

        let found: Vec<String> = products
            .search("RICE")
            .await
            .into_iter()
            .map(|p| p.code)
            .collect();
        assert_eq!(found, vec!["001"]);

        assert_eq!(products.search("002").await.len(), 1);
        assert_eq!(products.search("  ").await.len(), 2);

        let low: Vec<String> = products
            .list_below_minimum()
            .await
            .into_iter()
            .map(|p| p.code)
            .collect();
        assert_eq!(low, vec!["001"]);

        products.delete(&beans.id).await.unwrap();
        assert!(products.search("beans").await.is_empty());
    }

    #[test]
    fn test_margin_percent() {
        let pct = |cost: &str, sale: &str| {
            ProductController::margin_percent(
                Money::parse(cost).unwrap(),
                Money::parse(sale).unwrap(),
            )
        };

        assert_eq!(pct("0", "100"), 0.0);
        assert_eq!(pct("10", "15"), 50.0);
        assert_eq!(pct("20", "15"), -25.0);
        assert_eq!(pct("3", "4"), 33.33);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adjustments_keep_invariants() {
        let path = std::env::temp_dir().join(format!("stockwise-test-{}.db", new_id()));
        let db = Database::new(DbConfig::new(&path).max_connections(4))
            .await
            .unwrap();
        let products = ProductController::new(db.clone());
        let product = products.create(rice(50)).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let products = products.clone();
                let id = product.id.clone();
                tokio::spawn(async move {
                    products
                        .adjust_stock(&id, -10, MovementKind::Exit, "Sale", None)
                        .await
                })
            })
            .collect();

        let mut succeeded = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(e) => assert_eq!(e.kind, ErrorKind::Conflict),
            }
        }

        let current = products.find_by_id(&product.id).await.unwrap().current_stock;
        let ledger = products.movements(&product.id).await;

        assert!(current >= 0);
        assert_eq!(current, 50 - 10 * succeeded);
        assert_eq!(ledger.len() as i64, 1 + succeeded);
        assert_eq!(ledger[0].stock_after, current);

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let mut file = path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}
