//! # Controllers
//!
//! The operations the presentation layer calls.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Mutations (create / update / delete / adjust_stock)                   │
//! │      → OpResult<Entity> = Ok(entity) | Err(OpError { kind, message })   │
//! │                                                                         │
//! │  Queries (list / find / search / movements / list_below_minimum)       │
//! │      → Vec<Entity> | Option<Entity>                                     │
//! │        store failures are logged and read as "nothing found"            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod category;
pub mod product;

pub use category::{CategoryChanges, CategoryController};
pub use product::{NewProduct, ProductChanges, ProductController, StockAdjustment, MAX_STOCK_RETRIES};
