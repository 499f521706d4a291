//! # Category Repository
//!
//! Database operations for product categories.

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockwise_core::{Category, RecordStatus};

const CATEGORY_COLUMNS: &str = "id, name, description, status, created_at";

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1");

        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// Gets a category by its exact name, active or inactive.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE name = ?1");

        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// Lists categories ordered by name.
    ///
    /// ## Arguments
    /// * `active_only` - When true, inactive (soft-deleted) rows are skipped
    pub async fn list(&self, active_only: bool) -> DbResult<Vec<Category>> {
        let sql = if active_only {
            format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE status = 'active' ORDER BY name")
        } else {
            format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name")
        };

        let categories = sqlx::query_as::<_, Category>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = categories.len(), active_only, "Listed categories");
        Ok(categories)
    }

    /// Inserts a new category.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Name already taken
    pub async fn insert<'e, E>(&self, executor: E, category: &Category) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!(name = %category.name, "Inserting category");

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.status)
        .bind(category.created_at)
        .execute(executor)
        .await
        .map_err(|e| name_conflict(e, &category.name))?;

        Ok(())
    }

    /// Writes name and description of an existing category.
    pub async fn update<'e, E>(&self, executor: E, category: &Category) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!(id = %category.id, "Updating category");

        let result = sqlx::query(
            r#"
            UPDATE categories SET
                name = ?2,
                description = ?3
            WHERE id = ?1
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .execute(executor)
        .await
        .map_err(|e| name_conflict(e, &category.name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", &category.id));
        }

        Ok(())
    }

    /// Sets the status of a category (soft delete when `Inactive`).
    pub async fn set_status(&self, id: &str, status: RecordStatus) -> DbResult<()> {
        debug!(id = %id, status = status.as_str(), "Setting category status");

        let result = sqlx::query("UPDATE categories SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    /// Counts categories (for diagnostics).
    pub async fn count(&self, active_only: bool) -> DbResult<i64> {
        let sql = if active_only {
            "SELECT COUNT(*) FROM categories WHERE status = 'active'"
        } else {
            "SELECT COUNT(*) FROM categories"
        };

        let count: i64 = sqlx::query_scalar(sql).fetch_one(&self.pool).await?;
        Ok(count)
    }
}

/// Fills in the offending value on a unique violation.
fn name_conflict(err: sqlx::Error, name: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { field, .. } => DbError::duplicate(field, name),
        other => other,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = test_db().await;
        let repo = db.categories();

        let food = Category::new("Food", Some("Groceries"));
        repo.insert(db.pool(), &food).await.unwrap();

        let by_id = repo.get_by_id(&food.id).await.unwrap().unwrap();
        assert_eq!(by_id.name, "Food");
        assert_eq!(by_id.description.as_deref(), Some("Groceries"));
        assert_eq!(by_id.status, RecordStatus::Active);

        let by_name = repo.get_by_name("Food").await.unwrap().unwrap();
        assert_eq!(by_name.id, food.id);

        assert!(repo.get_by_name("Drinks").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = test_db().await;
        let repo = db.categories();

        repo.insert(db.pool(), &Category::new("Food", None)).await.unwrap();
        let err = repo
            .insert(db.pool(), &Category::new("Food", None))
            .await
            .unwrap_err();

        match err {
            DbError::UniqueViolation { value, .. } => assert_eq!(value, "Food"),
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let db = test_db().await;
        let repo = db.categories();

        let snacks = Category::new("Snacks", None);
        repo.insert(db.pool(), &snacks).await.unwrap();
        repo.insert(db.pool(), &Category::new("Beverages", None)).await.unwrap();
        repo.insert(db.pool(), &Category::new("Food", None)).await.unwrap();

        repo.set_status(&snacks.id, RecordStatus::Inactive).await.unwrap();

        let active: Vec<String> = repo
            .list(true)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(active, vec!["Beverages", "Food"]);

        let all = repo.list(false).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].status, RecordStatus::Inactive);

        assert_eq!(repo.count(true).await.unwrap(), 2);
        assert_eq!(repo.count(false).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_missing_category() {
        let db = test_db().await;

        let ghost = Category::new("Ghost", None);
        let err = db.categories().update(db.pool(), &ghost).await.unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
