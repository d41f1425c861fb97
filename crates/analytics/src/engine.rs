use crate::types::{EquityPoint, PerformanceReport, Trade};

/// The engine responsible for calculating performance metrics from a simulated run.
#[derive(Default)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates a performance report for one backtest.
    ///
    /// # Arguments
    ///
    /// * `initial_equity`: The starting value of the strategy.
    /// * `closes`: The closing prices the strategy ran over, used for the buy-and-hold benchmark.
    /// * `trades`: The trade log, including a trailing open trade if any.
    /// * `equity_curve`: One point per bar, starting with the initial equity.
    /// * `bars_in_market`: How many bars the strategy held the asset.
    pub fn calculate(
        &self,
        initial_equity: f64,
        closes: &[f64],
        trades: &[Trade],
        equity_curve: &[EquityPoint],
        bars_in_market: usize,
    ) -> PerformanceReport {
        let mut report = PerformanceReport::new();
        let Some(last_point) = equity_curve.last() else {
            return report; // Nothing was simulated.
        };

        // --- Returns ---
        report.initial_equity = initial_equity;
        report.final_equity = last_point.value;
        report.net_pnl_absolute = last_point.value - initial_equity;
        if initial_equity > 0.0 {
            report.net_pnl_percentage = report.net_pnl_absolute / initial_equity * 100.0;
        }

        if let (Some(first), Some(last)) = (closes.first(), closes.last()) {
            if *first > 0.0 {
                report.buy_and_hold_percentage = (last / first - 1.0) * 100.0;
            }
        }

        // --- Max Drawdown (Absolute & Percentage) ---
        let mut peak_equity = initial_equity;
        for point in equity_curve {
            peak_equity = peak_equity.max(point.value);
            let drawdown = peak_equity - point.value;
            if drawdown > report.max_drawdown_absolute {
                report.max_drawdown_absolute = drawdown;
                if peak_equity > 0.0 {
                    report.max_drawdown_percentage = drawdown / peak_equity * 100.0;
                }
            }
        }

        // --- Sharpe Ratio (Simplified) ---
        if equity_curve.len() > 1 {
            let returns: Vec<f64> = equity_curve
                .windows(2)
                .filter(|w| w[0].value > 0.0)
                .map(|w| w[1].value / w[0].value - 1.0)
                .collect();
            if !returns.is_empty() {
                let mean_return = returns.iter().sum::<f64>() / returns.len() as f64;
                let variance = returns.iter().map(|r| (r - mean_return).powi(2)).sum::<f64>()
                    / returns.len() as f64;
                let std_dev = variance.sqrt();
                report.sharpe_ratio = if std_dev > 0.0 { mean_return / std_dev } else { 0.0 };
            }
        }

        // --- Trades ---
        report.total_trades = trades.len() as u32;
        let closed: Vec<f64> = trades.iter().filter_map(Trade::pnl).collect();
        report.closed_trades = closed.len() as u32;
        if !closed.is_empty() {
            let winners = closed.iter().filter(|pnl| **pnl > 0.0).count();
            report.win_rate = winners as f64 / closed.len() as f64 * 100.0;
        }

        // The first bar is only the baseline, so it never counts as simulated.
        let simulated_bars = equity_curve.len().saturating_sub(1);
        if simulated_bars > 0 {
            report.exposure_percentage = bars_in_market as f64 / simulated_bars as f64 * 100.0;
        }

        report
    }
}
