//! # Customer Repository
//!
//! Database operations for customers. Customers are referenced by sales and
//! are soft-deleted like every other record.

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockwise_core::Customer;

const CUSTOMER_COLUMNS: &str = "id, name, tax_id, email, phone, address, status, created_at";

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a new customer.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Tax id already registered
    pub async fn insert<'e, E>(&self, executor: E, customer: &Customer) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!(name = %customer.name, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (
                id, name, tax_id, email, phone, address, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.tax_id)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.status)
        .bind(customer.created_at)
        .execute(executor)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => {
                DbError::duplicate(field, customer.tax_id.as_deref().unwrap_or_default())
            }
            other => other,
        })?;

        Ok(())
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1");

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Gets a customer by tax id.
    pub async fn get_by_tax_id(&self, tax_id: &str) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE tax_id = ?1");

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(tax_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Lists customers ordered by name.
    pub async fn list(&self, active_only: bool) -> DbResult<Vec<Customer>> {
        let sql = if active_only {
            format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE status = 'active' ORDER BY name")
        } else {
            format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name")
        };

        let customers = sqlx::query_as::<_, Customer>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    /// Marks a customer inactive.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting customer");

        let result = sqlx::query("UPDATE customers SET status = 'inactive' WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
