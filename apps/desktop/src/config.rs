//! # Application Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STOCKWISE_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read-only after initialization.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name of the database inside the platform data directory.
const DATABASE_FILE: &str = "stockwise.db";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Store name (window title, reports)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Explicit database location. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Log the low-stock report at startup
    pub report_low_stock: bool,
}

impl Default for AppConfig {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Store: "Stockwise"
    /// - Currency: "$" with 2 decimals
    /// - Database: platform data directory
    /// - Low-stock report: on
    fn default() -> Self {
        AppConfig {
            store_name: "Stockwise".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            database_path: None,
            report_low_stock: true,
        }
    }
}

impl AppConfig {
    /// Creates a new AppConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `STOCKWISE_DB_PATH`: Database file (`:memory:` for a throwaway database)
    /// - `STOCKWISE_STORE_NAME`: Override store name
    /// - `STOCKWISE_CURRENCY_SYMBOL`: Override currency symbol (e.g. "R$")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup (environment, test map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = AppConfig::default();

        if let Some(path) = lookup("STOCKWISE_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(store_name) = lookup("STOCKWISE_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(symbol) = lookup("STOCKWISE_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        config
    }

    /// Resolves where the database lives.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.stockwise.stockwise/stockwise.db`
    /// - **Windows**: `%APPDATA%\stockwise\stockwise\data\stockwise.db`
    /// - **Linux**: `~/.local/share/stockwise/stockwise.db`
    ///
    /// The data directory is created when missing.
    pub fn resolve_database_path(&self) -> std::io::Result<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let proj_dirs = ProjectDirs::from("com", "stockwise", "stockwise").ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine app data directory",
            )
        })?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DATABASE_FILE))
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use stockwise_desktop::config::AppConfig;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(2250), "$22.50");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_format_currency_positive() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(2250), "$22.50");
        assert_eq!(config.format_currency(100), "$1.00");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(0), "$0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(-1234), "-$12.34");
        assert_eq!(config.format_currency(-5), "-$0.05");
    }

    #[test]
    fn test_format_currency_custom_symbol() {
        let config = AppConfig {
            currency_symbol: "R$ ".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.format_currency(950), "R$ 9.50");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("STOCKWISE_DB_PATH", "/tmp/shop.db"),
            ("STOCKWISE_STORE_NAME", "Corner Shop"),
            ("STOCKWISE_CURRENCY_SYMBOL", "€"),
        ]);

        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.store_name, "Corner Shop");
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(
            config.resolve_database_path().unwrap(),
            PathBuf::from("/tmp/shop.db")
        );
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = AppConfig::from_lookup(|_| None);

        assert_eq!(config.store_name, "Stockwise");
        assert_eq!(config.currency_symbol, "$");
        assert!(config.database_path.is_none());
        assert!(config.report_low_stock);
    }
}
