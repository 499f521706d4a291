//! # Seed Data Generator
//!
//! Populates a database with a small sample catalogue for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./stockwise_dev.db (default)
//! cargo run -p stockwise-db --bin seed
//!
//! # Specify database path
//! cargo run -p stockwise-db --bin seed -- --db ./data/stockwise.db
//! ```
//!
//! ## Sample Data
//! - Categories: Food, Beverages
//! - Products: "001" Rice 5kg and "002" Beans 1kg, each with its
//!   initial-stock ledger entry
//! - One customer
//!
//! Everything is written in a single transaction: either the whole sample
//! lands or nothing does.

use chrono::Utc;
use std::env;
use stockwise_core::stock::{INITIAL_STOCK_NOTES, INITIAL_STOCK_REASON};
use stockwise_core::{
    new_id, Category, Customer, MovementKind, Product, RecordStatus, StockChange, DEFAULT_UNIT,
};
use stockwise_db::{commit, Database, DbConfig};

/// (code, name, cost cents, price cents, stock, minimum)
const PRODUCTS: &[(&str, &str, i64, i64, i64, i64)] = &[
    ("001", "Rice 5kg", 1500, 2250, 50, 10),
    ("002", "Beans 1kg", 600, 950, 30, 5),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./stockwise_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockwise Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./stockwise_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Stockwise Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count(false).await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut tx = db.begin().await?;

    // Categories
    let food = Category::new("Food", Some("Food products"));
    let beverages = Category::new("Beverages", Some("Drinks of all kinds"));
    for category in [&food, &beverages] {
        db.categories().insert(&mut *tx, category).await?;
        println!("  + category {}", category.name);
    }

    // Products with their opening ledger entries
    for &(code, name, cost_cents, price_cents, stock, minimum) in PRODUCTS {
        let now = Utc::now();
        let product = Product {
            id: new_id(),
            code: code.to_string(),
            name: name.to_string(),
            description: None,
            category_id: Some(food.id.clone()),
            cost_cents,
            price_cents,
            current_stock: stock,
            minimum_stock: minimum,
            unit: DEFAULT_UNIT.to_string(),
            status: RecordStatus::Active,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&mut *tx, &product).await?;

        if let Some(change) = StockChange::initial(stock) {
            let movement = change.into_movement(
                &product.id,
                MovementKind::Entry,
                INITIAL_STOCK_REASON,
                Some(INITIAL_STOCK_NOTES),
                now,
            );
            db.movements().insert(&mut *tx, &movement).await?;
        }

        println!(
            "  + product {} {} (stock {}, margin {:.2}%)",
            product.code,
            product.name,
            product.current_stock,
            product.margin_percent()
        );
    }

    // Customer
    let mut customer = Customer::new("John Smith");
    customer.tax_id = Some("123.456.789-00".to_string());
    customer.email = Some("john@example.com".to_string());
    customer.phone = Some("(11) 98765-4321".to_string());
    db.customers().insert(&mut *tx, &customer).await?;
    println!("  + customer {}", customer.name);

    commit(tx).await?;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
