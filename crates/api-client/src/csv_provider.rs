// In crates/api-client/src/csv_provider.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::Bar;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

use crate::{BarsRequest, DataProvider, Error, Result, normalize_bars};

/// Reads daily bars from a CSV file instead of the network.
///
/// Expected headers are `date,open,high,low,close` with an optional
/// `volume`; the capitalized `Date,Open,...` spelling is accepted too, and
/// extra columns (such as an exported `sma,equity`) are ignored. The date
/// column may carry a time suffix (`2024-01-02 00:00:00-05:00`); only the
/// calendar date is used.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvBar {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "Open")]
    open: Option<f64>,
    #[serde(alias = "High")]
    high: Option<f64>,
    #[serde(alias = "Low")]
    low: Option<f64>,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume")]
    volume: Option<f64>,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parses every row of the file, in file order.
    pub fn read_bars(&self) -> Result<Vec<Bar>> {
        let file = std::fs::File::open(&self.path).map_err(|e| Error::CsvError(e.into()))?;
        read_bars_from(file)
    }
}

/// Parses bars from any CSV source.
pub fn read_bars_from<R: Read>(source: R) -> Result<Vec<Bar>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let mut record = csv::StringRecord::new();

    let mut bars = Vec::new();
    while reader.read_record(&mut record)? {
        let row: CsvBar = record.deserialize(Some(&headers))?;
        let date = parse_date(&row.date).ok_or_else(|| Error::InvalidRecord {
            line: record.position().map_or(0, |position| position.line()),
            reason: format!("unrecognized date '{}'", row.date),
        })?;
        bars.push(Bar {
            date,
            open: row.open.unwrap_or(row.close),
            high: row.high.unwrap_or(row.close),
            low: row.low.unwrap_or(row.close),
            close: row.close,
            volume: row.volume.unwrap_or(0.0),
        });
    }

    Ok(bars)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

#[async_trait]
impl DataProvider for CsvProvider {
    fn name(&self) -> &'static str {
        "CsvFile"
    }

    async fn fetch_daily_bars(&self, request: &BarsRequest) -> Result<Vec<Bar>> {
        tracing::info!(path = %self.path.display(), symbol = %request.symbol, "Loading daily bars from file.");

        let bars: Vec<Bar> = normalize_bars(self.read_bars()?)
            .into_iter()
            .filter(|bar| request.range.contains(bar.date))
            .collect();

        if bars.is_empty() {
            return Err(Error::NoData {
                symbol: request.symbol.0.clone(),
            });
        }

        tracing::info!(count = bars.len(), "Loaded daily bars.");
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{DateRange, Symbol};
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(start: NaiveDate, end: NaiveDate) -> BarsRequest {
        BarsRequest {
            symbol: Symbol("BTC-USD".into()),
            range: DateRange::new(start, end).unwrap(),
        }
    }

    #[test]
    fn reads_lowercase_headers_and_ignores_extra_columns() {
        let data = "\
date,open,high,low,close,volume,sma,equity
2024-01-01,1,2,0.5,1.5,10,,404
2024-01-02,1.5,2.5,1,2,,,404
";
        let bars = read_bars_from(data.as_bytes()).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, date(2024, 1, 1));
        assert_eq!(bars[0].close, 1.5);
        assert_eq!(bars[0].volume, 10.0);
        assert_eq!(bars[1].volume, 0.0);
    }

    #[test]
    fn reads_capitalized_headers_with_timestamps() {
        let data = "\
Date,Open,High,Low,Close,Volume,Dividends,Stock Splits
2014-09-17 00:00:00+00:00,465.86,468.17,452.42,457.33,21056800,0.0,0.0
";
        let bars = read_bars_from(data.as_bytes()).unwrap();

        assert_eq!(bars[0].date, date(2014, 9, 17));
        assert_eq!(bars[0].open, 465.86);
    }

    #[test]
    fn rejects_unparseable_dates() {
        let data = "date,close\nyesterday,1.0\n";
        let err = read_bars_from(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { line: 2, .. }));
    }

    #[test]
    fn bad_date_reports_its_file_line() {
        let data = "date,close\n2024-01-01,1.0\n2024-01-03,2.0\nnot-a-date,3.0\n";
        let err = read_bars_from(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { line: 4, .. }), "{err:?}");
    }

    #[tokio::test]
    async fn provider_filters_to_the_requested_range() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "date,close").unwrap();
        for day in 1..=9 {
            writeln!(file, "2024-02-0{day},{day}").unwrap();
        }
        let provider = CsvProvider::new(file.path());

        let bars = provider
            .fetch_daily_bars(&request(date(2024, 2, 3), date(2024, 2, 6)))
            .await
            .unwrap();

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![3.0, 4.0, 5.0]);
    }

    #[tokio::test]
    async fn nothing_in_range_is_no_data() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "date,close\n2020-01-01,1").unwrap();
        let provider = CsvProvider::new(file.path());

        let err = provider
            .fetch_daily_bars(&request(date(2024, 1, 1), date(2024, 2, 1)))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NoData { .. }));
    }
}
