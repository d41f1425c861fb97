// In app/src/provider_factory.rs

use anyhow::{Context, Result};
use api_client::{ApiClient, CsvProvider, DataProvider};
use app_config::{DataSettings, DataSource};

/// Creates the data provider selected by the `data.source` setting.
///
/// The `csv` source needs `data.csv_path`; `Settings::validate` reports a
/// missing path before this is reached, the error here covers direct callers.
pub fn create_provider(settings: &DataSettings) -> Result<Box<dyn DataProvider>> {
    let provider: Box<dyn DataProvider> = match settings.source {
        DataSource::Yahoo => Box::new(ApiClient::new(settings)?),
        DataSource::Csv => {
            let path = settings
                .csv_path
                .as_deref()
                .context("data.csv_path is required for the csv source")?;
            Box::new(CsvProvider::new(path))
        }
    };
    Ok(provider)
}
