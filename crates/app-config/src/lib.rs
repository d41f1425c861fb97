// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{BacktestSettings, DataSettings, DataSource, OutputFormat, OutputSettings, Settings};

/// Loads the application settings from the `config/` directory.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(Path::new("config"))
}

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Built-in defaults (BTC-USD, 15 years, 404 invested, SMA200, 3/3 days).
/// 2. An optional `base.toml` in `dir`.
/// 3. An optional environment-specific file (e.g., `development.toml`).
/// 4. Environment variables (e.g., `APP_BACKTEST__TICKER=SPY`).
pub fn load_settings_from(dir: &Path) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        .set_default("app.environment", environment.as_str())?
        .set_default("app.log_level", "info")?
        .set_default("backtest.ticker", "BTC-USD")?
        .set_default("backtest.years", 15_i64)?
        .set_default("backtest.initial_investment", 404.0)?
        .set_default("backtest.window", 200_i64)?
        .set_default("strategy.entry_days", 3_i64)?
        .set_default("strategy.exit_days", 3_i64)?
        .set_default("data.source", "yahoo")?
        .set_default("data.rest_base_url", "https://query1.finance.yahoo.com")?
        .set_default("data.timeout_secs", 30_i64)?
        .set_default("output.format", "chart")?
        .add_source(File::from(dir.join("base")).required(false))
        .add_source(File::from(dir.join(&environment)).required(false))
        // The prefix is `APP`, separator is `__`.
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Deserialize the configuration into our `Settings` struct.
    let settings: Settings = settings.try_deserialize()?;

    Ok(settings)
}
