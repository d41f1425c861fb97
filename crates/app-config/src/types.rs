// In crates/app-config/src/types.rs

use backtester::SimulationSettings;
use serde::Deserialize;
use strategies::SmaStreakSettings;

use crate::error::{Error, Result};

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// What to backtest and with how much.
    pub backtest: BacktestSettings,
    /// Parameters of the SMA streak rule.
    pub strategy: SmaStreakSettings,
    /// Where historical bars come from.
    pub data: DataSettings,
    /// How results are presented.
    pub output: OutputSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BacktestSettings {
    /// The symbol to fetch, as the data provider names it (e.g. "BTC-USD").
    pub ticker: String,
    /// Length of the lookback window ending today.
    pub years: u32,
    /// Starting equity of the strategy.
    pub initial_investment: f64,
    /// The SMA period.
    pub window: usize,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Yahoo,
    Csv,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DataSettings {
    pub source: DataSource,
    /// The REST base URL of the Yahoo Finance chart API.
    pub rest_base_url: String,
    /// Input file for the `csv` source.
    pub csv_path: Option<String>,
    /// HTTP request timeout.
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Chart,
    Csv,
}

#[derive(Deserialize, Debug, Clone)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub chart_path: Option<String>,
    pub csv_path: Option<String>,
    pub title: Option<String>,
}

impl OutputSettings {
    /// The chart file, defaulting to `{ticker}_sma{window}_strategy.html`.
    pub fn chart_path_for(&self, backtest: &BacktestSettings) -> String {
        self.chart_path
            .clone()
            .unwrap_or_else(|| format!("{}.html", default_stem(backtest)))
    }

    /// The export file, defaulting to `{ticker}_sma{window}_strategy.csv`.
    pub fn csv_path_for(&self, backtest: &BacktestSettings) -> String {
        self.csv_path
            .clone()
            .unwrap_or_else(|| format!("{}.csv", default_stem(backtest)))
    }

    pub fn title_for(&self, backtest: &BacktestSettings, strategy: &SmaStreakSettings) -> String {
        self.title.clone().unwrap_or_else(|| {
            format!(
                "{}, SMA{}, {}-Day Strategy",
                backtest.ticker, backtest.window, strategy.entry_days
            )
        })
    }
}

fn default_stem(backtest: &BacktestSettings) -> String {
    let ticker: String = backtest
        .ticker
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    format!("{}_sma{}_strategy", ticker, backtest.window)
}

impl Settings {
    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.backtest.ticker.trim().is_empty() {
            return Err(Error::Invalid { key: "backtest.ticker", reason: "must not be empty".into() });
        }
        if self.backtest.years == 0 {
            return Err(Error::Invalid { key: "backtest.years", reason: "must be at least 1".into() });
        }
        if !(self.backtest.initial_investment.is_finite() && self.backtest.initial_investment > 0.0) {
            return Err(Error::Invalid {
                key: "backtest.initial_investment",
                reason: format!("must be a positive amount, got {}", self.backtest.initial_investment),
            });
        }
        if self.backtest.window == 0 {
            return Err(Error::Invalid { key: "backtest.window", reason: "must be at least 1".into() });
        }
        if self.strategy.entry_days == 0 {
            return Err(Error::Invalid { key: "strategy.entry_days", reason: "must be at least 1".into() });
        }
        if self.strategy.exit_days == 0 {
            return Err(Error::Invalid { key: "strategy.exit_days", reason: "must be at least 1".into() });
        }
        if self.data.source == DataSource::Csv && self.data.csv_path.is_none() {
            return Err(Error::Invalid { key: "data.csv_path", reason: "is required for the csv source".into() });
        }
        Ok(())
    }

    /// The parameters handed to the simulation entry point.
    pub fn simulation(&self) -> SimulationSettings {
        SimulationSettings {
            initial_investment: self.backtest.initial_investment,
            window: self.backtest.window,
            strategy: self.strategy.clone(),
        }
    }
}
