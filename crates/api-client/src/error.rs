// In crates/api-client/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build the API client: {0}")]
    ClientBuildError(String),
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
    #[error("API error: code {code}, msg: {msg}")]
    ApiError { code: String, msg: String },
    #[error("Failed to read CSV data: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },
    #[error("No historical data returned for ticker: {symbol}")]
    NoData { symbol: String },
}

pub type Result<T> = std::result::Result<T, Error>;
