//! # Stockwise Desktop Library
//!
//! Application layer of the Stockwise back office: the controllers a UI
//! calls, the error type they return, configuration and startup.
//!
//! ## Module Organization
//! ```text
//! stockwise_desktop/
//! ├── lib.rs              ◄─── You are here (startup: tracing, database, App)
//! ├── config.rs           ◄─── AppConfig (env overrides, data directory)
//! ├── error.rs            ◄─── OpError / ErrorKind returned by mutations
//! └── controllers/
//!     ├── category.rs     ◄─── Category CRUD + delete guard
//!     └── product.rs      ◄─── Product CRUD + stock adjustment
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. init_tracing()                                                      │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: info,stockwise=debug,sqlx=warn (override with RUST_LOG) │
//! │                                                                         │
//! │  2. AppConfig::from_env()                                               │
//! │     • STOCKWISE_DB_PATH or the platform data directory                  │
//! │                                                                         │
//! │  3. App::open(config)                                                   │
//! │     • SQLite (WAL for files), migrations                                │
//! │     • CategoryController + ProductController sharing one pool           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod controllers;
pub mod error;

use thiserror::Error;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use controllers::{CategoryController, ProductController};
use stockwise_db::{Database, DbConfig, DbError, IN_MEMORY_PATH};

/// Failures that stop the application from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Could not resolve the data directory: {0}")]
    DataDir(#[from] std::io::Error),

    #[error("Could not open the database: {0}")]
    Database(#[from] DbError),
}

/// Everything a presentation layer needs, opened once at startup.
#[derive(Debug, Clone)]
pub struct App {
    pub config: AppConfig,
    pub db: Database,
    pub categories: CategoryController,
    pub products: ProductController,
}

impl App {
    /// Opens the database described by `config` and builds the controllers.
    pub async fn open(config: AppConfig) -> Result<Self, StartupError> {
        let db = open_database(&config).await?;

        Ok(App {
            categories: CategoryController::new(db.clone()),
            products: ProductController::new(db.clone()),
            config,
            db,
        })
    }
}

/// Opens (creating and migrating if needed) the configured database.
pub async fn open_database(config: &AppConfig) -> Result<Database, StartupError> {
    let path = config.resolve_database_path()?;
    info!(?path, "Database path determined");

    let db_config = if path.as_os_str() == IN_MEMORY_PATH {
        DbConfig::in_memory()
    } else {
        DbConfig::new(path)
    };

    let db = Database::new(db_config).await?;
    info!("Database connected and migrations applied");

    Ok(db)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockwise=trace` - Show trace for stockwise crates only
/// - Default: INFO, DEBUG for stockwise crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockwise=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}
