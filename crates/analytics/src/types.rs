// In crates/analytics/src/types.rs

use chrono::NaiveDate;
use core_types::Symbol;
use serde::{Deserialize, Serialize};

/// A round trip of the strategy, from the entry bar to the exit bar.
///
/// Equity values are taken from the simulated curve: `entry_equity` is the
/// value before the entry bar's return is applied, `exit_equity` the value
/// recorded on the exit bar. A trade still open when the series ends has no
/// exit fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub symbol: Symbol,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub entry_equity: f64,
    pub exit_date: Option<NaiveDate>,
    pub exit_price: Option<f64>,
    pub exit_equity: Option<f64>,
}

impl Trade {
    pub fn is_closed(&self) -> bool {
        self.exit_date.is_some()
    }

    /// Equity gained over the trade, `None` while it is still open.
    pub fn pnl(&self) -> Option<f64> {
        self.exit_equity.map(|exit| exit - self.entry_equity)
    }
}

/// A struct to hold a point in the strategy's equity curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A summary of a strategy's performance over a backtest period.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PerformanceReport {
    pub initial_equity: f64,
    pub final_equity: f64,
    pub net_pnl_absolute: f64,
    pub net_pnl_percentage: f64,
    /// Return of simply holding the asset from the first to the last bar.
    pub buy_and_hold_percentage: f64,
    pub max_drawdown_absolute: f64,
    pub max_drawdown_percentage: f64,
    /// Mean over standard deviation of per-bar equity returns (not annualized).
    pub sharpe_ratio: f64,
    pub total_trades: u32,
    pub closed_trades: u32,
    pub win_rate: f64,
    /// Share of simulated bars spent in the market.
    pub exposure_percentage: f64,
}

impl PerformanceReport {
    /// Creates a new, empty report with zero values.
    pub fn new() -> Self {
        Self::default()
    }
}
