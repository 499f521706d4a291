//! # Stockwise Desktop Entry Point
//!
//! Opens the configured database and reports the state of the store.
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockwise Back Office                            │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                   Presentation layer (UI)                        │  │
//! │  │   product table • category form • stock adjustment dialog        │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 │ controller calls                      │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Rust backend (this crate)                     │  │
//! │  │                                                                  │  │
//! │  │  main.rs ──────► logging, config, database, startup report      │  │
//! │  │  controllers/ ─► CategoryController, ProductController          │  │
//! │  │  error.rs ─────► OpResult<T> = Ok(entity) | Err(OpError)        │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         SQLite Database                          │  │
//! │  │  stockwise.db (local file, WAL mode)                             │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use stockwise_desktop::config::AppConfig;
use stockwise_desktop::{init_tracing, App};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = AppConfig::from_env();
    info!(store = %config.store_name, "Starting Stockwise");

    let app = match App::open(config).await {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    let categories = app.categories.list(true).await;
    let products = app.products.list(true).await;
    info!(
        categories = categories.len(),
        products = products.len(),
        "Store loaded"
    );

    if app.config.report_low_stock {
        let low = app.products.list_below_minimum().await;

        if low.is_empty() {
            info!("No product is below its minimum stock");
        }

        for product in &low {
            warn!(
                code = %product.code,
                name = %product.name,
                stock = product.current_stock,
                minimum = product.minimum_stock,
                price = %app.config.format_currency(product.price_cents),
                "Low stock"
            );
        }
    }

    app.db.close().await;
    ExitCode::SUCCESS
}
