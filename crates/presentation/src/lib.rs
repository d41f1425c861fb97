// In crates/presentation/src/lib.rs

use core_types::AnnotatedBar;
use std::path::PathBuf;

pub mod chart;
pub mod error;
pub mod export;

pub use chart::HtmlChart;
pub use error::{Error, Result};
pub use export::{CsvExport, write_bars};

/// The universal interface for showing the result of a backtest.
///
/// A presenter turns the annotated series into some artifact and reports
/// where it went. Failing is part of the contract: the caller decides what
/// to fall back to.
pub trait Presenter {
    /// The name of the presenter (e.g., "HtmlChart", "CsvExport").
    fn name(&self) -> &'static str;

    /// Presents `rows` under `title`, returning the path of the written artifact.
    fn present(&self, title: &str, rows: &[AnnotatedBar]) -> Result<PathBuf>;
}
