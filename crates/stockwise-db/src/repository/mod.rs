//! # Repository Module
//!
//! One repository per table.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories and Executors                           │
//! │                                                                         │
//! │  Controller                                                            │
//! │       │                                                                 │
//! │       ├── db.products().get_by_id(id)         reads through the pool   │
//! │       │                                                                 │
//! │       └── let mut tx = db.begin()                                      │
//! │           db.products().compare_and_set_stock(&mut *tx, ..)            │
//! │           db.movements().insert(&mut *tx, ..)                          │
//! │           commit(tx)                          one atomic unit          │
//! │                                                                         │
//! │  Write methods take any `sqlx::Executor<Database = Sqlite>`, so the    │
//! │  same SQL runs on `&SqlitePool` or on `&mut *tx`.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`](category::CategoryRepository) - Category CRUD
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD, search and stock
//! - [`StockMovementRepository`](stock_movement::StockMovementRepository) - Stock ledger
//! - [`CustomerRepository`](customer::CustomerRepository) - Customers
//! - [`SaleRepository`](sale::SaleRepository) - Sales and sale items

pub mod category;
pub mod customer;
pub mod product;
pub mod sale;
pub mod stock_movement;
