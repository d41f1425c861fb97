// In crates/backtester/src/logger.rs

use analytics::types::{EquityPoint, Trade};
use chrono::NaiveDate;
use core_types::Symbol;

/// A logger responsible for recording trades and equity changes during a backtest.
#[derive(Debug)]
pub struct TradeLogger {
    symbol: Symbol,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    open_trade: Option<Trade>,
}

impl TradeLogger {
    /// Creates a new, empty logger.
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            trades: Vec::new(),
            equity_curve: Vec::new(),
            open_trade: None,
        }
    }

    /// Records a point in the equity curve.
    pub fn record_equity(&mut self, date: NaiveDate, value: f64) {
        self.equity_curve.push(EquityPoint { date, value });
    }

    /// Starts a trade. `equity` is the value before the entry bar's return.
    pub fn open_trade(&mut self, date: NaiveDate, price: f64, equity: f64) {
        if let Some(stale) = self.open_trade.take() {
            tracing::warn!(entry = %stale.entry_date, "Opening a trade while another is open; keeping the old one as unclosed.");
            self.trades.push(stale);
        }
        self.open_trade = Some(Trade {
            symbol: self.symbol.clone(),
            entry_date: date,
            entry_price: price,
            entry_equity: equity,
            exit_date: None,
            exit_price: None,
            exit_equity: None,
        });
    }

    /// Completes the open trade, if any, and moves it to the log.
    pub fn close_trade(&mut self, date: NaiveDate, price: f64, equity: f64) {
        match self.open_trade.take() {
            Some(mut trade) => {
                trade.exit_date = Some(date);
                trade.exit_price = Some(price);
                trade.exit_equity = Some(equity);
                self.trades.push(trade);
            }
            None => tracing::warn!(%date, "Close requested with no open trade."),
        }
    }

    /// Consumes the logger, appending a still-open trade to the end of the log.
    pub fn finish(mut self) -> (Vec<Trade>, Vec<EquityPoint>) {
        if let Some(trade) = self.open_trade.take() {
            self.trades.push(trade);
        }
        (self.trades, self.equity_curve)
    }
}
