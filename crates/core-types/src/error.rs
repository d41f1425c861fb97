// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The simulator was handed a series it cannot run over (an empty one).
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Series length mismatch: {bars} bars but {values} values")]
    SeriesLengthMismatch { bars: usize, values: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, Error>;
