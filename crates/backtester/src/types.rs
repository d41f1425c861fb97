// In crates/backtester/src/types.rs

use analytics::types::{EquityPoint, PerformanceReport, Trade};
use core_types::{AnnotatedBar, Symbol};
use serde::{Deserialize, Serialize};
use strategies::SmaStreakSettings;

/// Everything a single simulation run needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Starting equity of the strategy.
    pub initial_investment: f64,
    /// SMA period.
    pub window: usize,
    pub strategy: SmaStreakSettings,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            initial_investment: 404.0,
            window: 200,
            strategy: SmaStreakSettings::default(),
        }
    }
}

/// The output of one backtest.
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub symbol: Symbol,
    /// The input bars, each with its SMA and equity value.
    pub rows: Vec<AnnotatedBar>,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
    pub report: PerformanceReport,
}
