//! # stockwise-db: Database Layer for Stockwise
//!
//! SQLite storage for categories, products, customers, sales and the stock
//! ledger, accessed asynchronously through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockwise Data Flow                              │
//! │                                                                         │
//! │  Controller (ProductController::adjust_stock)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   stockwise-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐ │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │ │   │
//! │  │   │               │    │ CategoryRepo   │    │              │ │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo    │    │ 001_initial  │ │   │
//! │  │   │ begin()/commit│    │ StockMovement  │    │   _schema    │ │   │
//! │  │   │               │    │ Customer, Sale │    │              │ │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (platform data dir) or `:memory:` in tests                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation, configuration, transactions
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per table
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockwise_db::{commit, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("stockwise.db")).await?;
//!
//! let mut tx = db.begin().await?;
//! db.products().insert(&mut *tx, &product).await?;
//! db.movements().insert(&mut *tx, &movement).await?;
//! commit(tx).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{commit, Database, DbConfig, IN_MEMORY_PATH};

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::customer::CustomerRepository;
pub use repository::product::{ProductRepository, ProductUpdate};
pub use repository::sale::SaleRepository;
pub use repository::stock_movement::StockMovementRepository;
