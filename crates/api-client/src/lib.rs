// In crates/api-client/src/lib.rs

use app_config::types::DataSettings;
use async_trait::async_trait;
use chrono::{DateTime, NaiveTime};
use core_types::{Bar, DateRange, Symbol};
use std::time::Duration;

pub mod csv_provider;
pub mod error;
pub mod normalize;
pub mod types;

// Re-export public types
pub use csv_provider::CsvProvider;
pub use error::{Error, Result};
pub use normalize::normalize_bars;
pub use types::*;

/// The universal interface for a source of historical daily bars.
///
/// Implementations return bars inside the requested range, sorted and
/// unique by date. An empty result is reported as `Error::NoData` rather
/// than an empty vector.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// The name of the provider (e.g., "YahooFinance", "CsvFile").
    fn name(&self) -> &'static str;

    async fn fetch_daily_bars(&self, request: &BarsRequest) -> Result<Vec<Bar>>;
}

impl ApiClient {
    /// Constructs a new ApiClient from DataSettings.
    pub fn new(settings: &DataSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            // The chart endpoint rejects requests without a browser-like agent.
            .user_agent("Mozilla/5.0 (compatible; trendline)")
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;
        let base_url = settings.rest_base_url.trim_end_matches('/').to_string();
        Ok(ApiClient {
            http_client,
            base_url,
        })
    }

    /// Fetches daily bars for `symbol` within `range`.
    ///
    /// This corresponds to the `GET /v8/finance/chart/{symbol}` endpoint with
    /// `interval=1d`. Bars come back normalized and clipped to the range.
    pub async fn get_daily_bars(&self, symbol: &Symbol, range: &DateRange) -> Result<Vec<Bar>> {
        let period1 = range.start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = range.end.and_time(NaiveTime::MIN).and_utc().timestamp();
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol.0);

        tracing::info!(symbol = %symbol, from = %range.start, to = %range.end, "Downloading daily bars.");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await
            .map_err(Error::RequestFailed)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::RequestFailed)?;

        // Yahoo reports errors inside the chart envelope, even on 404s.
        let bars = match parse_chart(&body) {
            Ok(bars) => bars,
            Err(Error::DeserializationFailed(e)) if !status.is_success() => {
                tracing::debug!(error = %e, "Error response was not a chart envelope.");
                return Err(Error::ApiError {
                    code: status.as_u16().to_string(),
                    msg: body.chars().take(200).collect(),
                });
            }
            Err(e) => return Err(e),
        };

        let bars: Vec<Bar> = normalize_bars(bars)
            .into_iter()
            .filter(|bar| range.contains(bar.date))
            .collect();

        if bars.is_empty() {
            return Err(Error::NoData {
                symbol: symbol.0.clone(),
            });
        }

        tracing::info!(count = bars.len(), symbol = %symbol, "Received daily bars.");
        Ok(bars)
    }
}

#[async_trait]
impl DataProvider for ApiClient {
    fn name(&self) -> &'static str {
        "YahooFinance"
    }

    async fn fetch_daily_bars(&self, request: &BarsRequest) -> Result<Vec<Bar>> {
        self.get_daily_bars(&request.symbol, &request.range).await
    }
}

/// Converts a chart response body into bars, in the order the API returned them.
///
/// Days without a close are skipped; a missing open, high or low falls back
/// to the close. Dates are the exchange's local calendar date.
pub fn parse_chart(body: &str) -> Result<Vec<Bar>> {
    let response: ChartResponse = serde_json::from_str(body).map_err(Error::DeserializationFailed)?;

    if let Some(error) = response.chart.error {
        return Err(Error::ApiError {
            code: error.code,
            msg: error.description,
        });
    }

    let Some(result) = response.chart.result.and_then(|results| results.into_iter().next()) else {
        return Ok(Vec::new());
    };

    tracing::debug!(
        symbol = ?result.meta.symbol,
        currency = ?result.meta.currency,
        points = result.timestamp.len(),
        "Parsing chart result."
    );

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let bars = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let close = value(&quote.close, i)?;
            let date = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0)?.date_naive();
            Some(Bar {
                date,
                open: value(&quote.open, i).unwrap_or(close),
                high: value(&quote.high, i).unwrap_or(close),
                low: value(&quote.low, i).unwrap_or(close),
                close,
                volume: value(&quote.volume, i).unwrap_or(0.0),
            })
        })
        .collect();

    Ok(bars)
}

fn value(column: &[Option<f64>], i: usize) -> Option<f64> {
    column.get(i).copied().flatten()
}
