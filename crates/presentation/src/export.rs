// In crates/presentation/src/export.rs

use chrono::NaiveDate;
use core_types::{AnnotatedBar, Bar};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::{Error, Presenter, Result};

/// Writes the annotated series as a flat table:
/// `date,open,high,low,close,volume,sma,equity`.
///
/// Undefined SMA values are written as empty cells.
#[derive(Debug, Clone)]
pub struct CsvExport {
    path: PathBuf,
}

#[derive(Debug, Serialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    sma: Option<f64>,
    equity: f64,
}

impl From<&AnnotatedBar> for CsvRow {
    fn from(row: &AnnotatedBar) -> Self {
        Self {
            date: row.bar.date,
            open: row.bar.open,
            high: row.bar.high,
            low: row.bar.low,
            close: row.bar.close,
            volume: row.bar.volume,
            sma: row.sma,
            equity: row.equity,
        }
    }
}

impl CsvExport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Presenter for CsvExport {
    fn name(&self) -> &'static str {
        "CsvExport"
    }

    fn present(&self, _title: &str, rows: &[AnnotatedBar]) -> Result<PathBuf> {
        if rows.is_empty() {
            return Err(Error::EmptySeries);
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        for row in rows {
            writer.serialize(CsvRow::from(row))?;
        }
        writer.flush()?;

        tracing::info!(path = %self.path.display(), rows = rows.len(), "Exported strategy data.");
        Ok(self.path.clone())
    }
}

/// Writes raw bars as `date,open,high,low,close,volume`.
pub fn write_bars(path: &Path, bars: &[Bar]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for bar in bars {
        writer.serialize(bar)?;
    }
    writer.flush()?;
    Ok(())
}
