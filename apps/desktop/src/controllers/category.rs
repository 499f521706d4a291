//! # Category Controller
//!
//! Validation and persistence rules for product categories.
//!
//! ## Delete Guard
//! ```text
//! delete(id)
//!    │
//!    ├── no such category ─────────────► NotFound
//!    │
//!    ├── any product points at it ─────► Conflict (active or inactive product)
//!    │
//!    └── otherwise ────────────────────► status = Inactive
//! ```

use stockwise_core::validation::validate_category_name;
use stockwise_core::{normalize_optional, Category, RecordStatus};
use stockwise_db::Database;
use tracing::{error, info, warn};

use crate::error::{OpError, OpResult};

/// Fields of a category that can be changed. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    /// A blank description clears it.
    pub description: Option<String>,
}

/// Category operations used by the presentation layer.
#[derive(Debug, Clone)]
pub struct CategoryController {
    db: Database,
}

impl CategoryController {
    pub fn new(db: Database) -> Self {
        CategoryController { db }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lists categories ordered by name. Store failures yield an empty list.
    pub async fn list(&self, active_only: bool) -> Vec<Category> {
        self.db
            .categories()
            .list(active_only)
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "Failed to list categories");
                Vec::new()
            })
    }

    /// Finds a category by id, active or not.
    pub async fn find_by_id(&self, id: &str) -> Option<Category> {
        self.db
            .categories()
            .get_by_id(id)
            .await
            .unwrap_or_else(|e| {
                error!(id = %id, error = %e, "Failed to load category");
                None
            })
    }

    /// Finds a category by its exact (trimmed) name, active or not.
    pub async fn find_by_name(&self, name: &str) -> Option<Category> {
        self.db
            .categories()
            .get_by_name(name.trim())
            .await
            .unwrap_or_else(|e| {
                error!(name = %name, error = %e, "Failed to load category by name");
                None
            })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Creates an active category.
    ///
    /// ## Errors
    /// - `Validation` - name blank or too long
    /// - `Duplicate` - a category (active or inactive) already has the name
    pub async fn create(&self, name: &str, description: Option<&str>) -> OpResult<Category> {
        let name = validate_category_name(name)?;

        if self.db.categories().get_by_name(&name).await?.is_some() {
            warn!(name = %name, "Rejected duplicate category");
            return Err(OpError::duplicate(format!("Category '{}' already exists", name)));
        }

        let category = Category::new(&name, description);
        self.db.categories().insert(self.db.pool(), &category).await?;

        info!(id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Applies the supplied changes to a category.
    ///
    /// ## Errors
    /// - `NotFound` - no category with that id
    /// - `Validation` - supplied name blank or too long
    /// - `Duplicate` - supplied name belongs to another category
    pub async fn update(&self, id: &str, changes: CategoryChanges) -> OpResult<Category> {
        let mut category = self
            .db
            .categories()
            .get_by_id(id)
            .await?
            .ok_or_else(|| OpError::not_found("Category", id))?;

        if let Some(name) = changes.name.as_deref() {
            let name = validate_category_name(name)?;

            if let Some(other) = self.db.categories().get_by_name(&name).await? {
                if other.id != category.id {
                    warn!(id = %id, name = %name, "Rejected category rename to a taken name");
                    return Err(OpError::duplicate(format!(
                        "Another category is already named '{}'",
                        name
                    )));
                }
            }

            category.name = name;
        }

        if let Some(description) = changes.description.as_deref() {
            category.description = normalize_optional(Some(description));
        }

        self.db.categories().update(self.db.pool(), &category).await?;

        info!(id = %category.id, "Category updated");
        Ok(category)
    }

    /// Soft-deletes a category nothing refers to.
    ///
    /// ## Errors
    /// - `NotFound` - no category with that id
    /// - `Conflict` - at least one product (active or inactive) uses it
    pub async fn delete(&self, id: &str) -> OpResult<Category> {
        let mut category = self
            .db
            .categories()
            .get_by_id(id)
            .await?
            .ok_or_else(|| OpError::not_found("Category", id))?;

        let products = self.db.products().count_in_category(id).await?;
        if products > 0 {
            warn!(id = %id, products, "Rejected delete of category in use");
            return Err(OpError::conflict(format!(
                "Category '{}' still has {} product(s)",
                category.name, products
            )));
        }

        self.db
            .categories()
            .set_status(id, RecordStatus::Inactive)
            .await?;
        category.status = RecordStatus::Inactive;

        info!(id = %id, name = %category.name, "Category deleted");
        Ok(category)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
