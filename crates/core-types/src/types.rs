// In crates/core-types/src/types.rs

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A ticker symbol as understood by the data provider (e.g. "BTC-USD", "SPY").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One trading day's OHLC record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Zero when the source does not report volume.
    #[serde(default)]
    pub volume: f64,
}

/// Whether the strategy holds the asset during a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PositionState {
    #[default]
    Flat,
    Long,
}

/// The decision a strategy makes after assessing a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Signal {
    /// Open a long position on this bar.
    GoLong,
    /// Close the open position on this bar.
    Close,
    Hold,
}

/// A bar together with the series the simulation derived for it.
///
/// This is what presentation receives: price, the moving average (absent
/// during the warm-up window) and the strategy equity, all keyed by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedBar {
    pub bar: Bar,
    pub sma: Option<f64>,
    pub equity: f64,
}

/// A half-open calendar range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start >= end {
            return Err(Error::InvalidParameter(format!(
                "start date {start} must be before end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The `years`-long window ending (exclusively) at `end`.
    ///
    /// Month arithmetic clamps to the end of the month, so a lookback from
    /// Feb 29 lands on Feb 28 of a non-leap year.
    pub fn lookback(end: NaiveDate, years: u32) -> Result<Self> {
        if years == 0 {
            return Err(Error::InvalidParameter("lookback must be at least one year".into()));
        }
        let start = end
            .checked_sub_months(Months::new(years.saturating_mul(12)))
            .ok_or_else(|| Error::InvalidParameter(format!("{years} years before {end} is out of range")))?;
        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}
