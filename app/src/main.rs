// In app/src/main.rs

use anyhow::Result;
use api_client::BarsRequest;
use app_config::{DataSource, OutputFormat, Settings};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use core_types::{DateRange, Symbol};
use presentation::{CsvExport, HtmlChart, Presenter};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

mod provider_factory;
mod report;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Backtests a trend-following strategy that goes long after consecutive closes above a simple moving average."
)]
struct Cli {
    /// Log level (error, warn, info, debug, trace). Defaults to `app.log_level`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Where the bars come from. Anything left out falls back to the configuration.
#[derive(Args, Debug, Default)]
struct MarketArgs {
    /// The ticker symbol as the data provider names it (e.g., "BTC-USD").
    #[arg(short, long)]
    ticker: Option<String>,

    /// How many years of history, ending today.
    #[arg(short, long)]
    years: Option<u32>,

    /// The data source.
    #[arg(long, value_enum)]
    source: Option<SourceArg>,

    /// Input file for `--source csv`.
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs the SMA streak backtest and presents the result.
    Backtest {
        #[command(flatten)]
        market: MarketArgs,

        /// Starting equity of the strategy.
        #[arg(long)]
        initial_investment: Option<f64>,

        /// The SMA period.
        #[arg(short, long)]
        window: Option<usize>,

        /// Consecutive closes above the SMA needed to enter.
        #[arg(long)]
        entry_days: Option<u32>,

        /// Consecutive closes at or below the SMA needed to exit.
        #[arg(long)]
        exit_days: Option<u32>,

        /// How to present the result.
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Output file for the chosen format.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Chart title.
        #[arg(long)]
        title: Option<String>,
    },

    /// Downloads daily bars and saves them as CSV for later offline runs.
    Fetch {
        #[command(flatten)]
        market: MarketArgs,

        /// Where to write the bars.
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SourceArg {
    Yahoo,
    Csv,
}

impl From<SourceArg> for DataSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Yahoo => DataSource::Yahoo,
            SourceArg::Csv => DataSource::Csv,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Chart,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Chart => OutputFormat::Chart,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();
    let mut settings = app_config::load_settings()?;

    // --- Tracing Setup ---
    let level: tracing::Level = cli
        .log_level
        .as_deref()
        .unwrap_or(&settings.app.log_level)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid log level: {}", e))?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            tracing_subscriber::filter::Targets::new()
                .with_target("hyper", tracing::Level::WARN)
                .with_target("reqwest", tracing::Level::WARN)
                .with_default(level),
        );
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::info!(environment = %settings.app.environment, "Starting trendline");

    // Match on the parsed command and call the appropriate handler.
    match cli.command {
        Commands::Backtest {
            market,
            initial_investment,
            window,
            entry_days,
            exit_days,
            format,
            output,
            title,
        } => {
            apply_market_args(&mut settings, market);
            if let Some(value) = initial_investment {
                settings.backtest.initial_investment = value;
            }
            if let Some(value) = window {
                settings.backtest.window = value;
            }
            if let Some(value) = entry_days {
                settings.strategy.entry_days = value;
            }
            if let Some(value) = exit_days {
                settings.strategy.exit_days = value;
            }
            if let Some(value) = format {
                settings.output.format = value.into();
            }
            if let Some(path) = output {
                let path = path.to_string_lossy().into_owned();
                match settings.output.format {
                    OutputFormat::Chart => settings.output.chart_path = Some(path),
                    OutputFormat::Csv => settings.output.csv_path = Some(path),
                }
            }
            if title.is_some() {
                settings.output.title = title;
            }
            handle_backtest(&settings).await?;
        }
        Commands::Fetch { market, output } => {
            apply_market_args(&mut settings, market);
            handle_fetch(&settings, output).await?;
        }
    }

    tracing::info!("trendline has finished successfully.");

    Ok(())
}

fn apply_market_args(settings: &mut Settings, market: MarketArgs) {
    if let Some(ticker) = market.ticker {
        settings.backtest.ticker = ticker;
    }
    if let Some(years) = market.years {
        settings.backtest.years = years;
    }
    if let Some(source) = market.source {
        settings.data.source = source.into();
    }
    if let Some(input) = market.input {
        settings.data.csv_path = Some(input.to_string_lossy().into_owned());
        // An input file implies the CSV source unless one was chosen explicitly.
        if market.source.is_none() {
            settings.data.source = DataSource::Csv;
        }
    }
}

/// Loads the bars every command starts from.
async fn load_bars(settings: &Settings) -> Result<(Symbol, Vec<core_types::Bar>)> {
    let symbol = Symbol(settings.backtest.ticker.clone());
    let range = DateRange::lookback(Utc::now().date_naive(), settings.backtest.years)?;
    let provider = provider_factory::create_provider(&settings.data)?;

    tracing::info!(
        provider = provider.name(),
        symbol = %symbol,
        from = %range.start,
        to = %range.end,
        "Loading historical data..."
    );
    let bars = provider
        .fetch_daily_bars(&BarsRequest {
            symbol: symbol.clone(),
            range,
        })
        .await?;
    tracing::info!("Loaded {} bars for the specified date range.", bars.len());

    Ok((symbol, bars))
}

// --- "Backtest" Subcommand Logic ---

/// Handles the logic for the `backtest` subcommand.
async fn handle_backtest(settings: &Settings) -> Result<()> {
    // --- 1. Configuration ---
    settings.validate()?;

    // --- 2. Load Data ---
    let (symbol, bars) = load_bars(settings).await?;

    // --- 3. Run the Backtester ---
    let result = backtester::run_backtest(symbol, &bars, &settings.simulation())?;
    report::print_report(&result);

    // --- 4. Present the Results ---
    let title = settings.output.title_for(&settings.backtest, &settings.strategy);
    let export = CsvExport::new(settings.output.csv_path_for(&settings.backtest));
    let (primary, fallback): (Box<dyn Presenter>, Option<CsvExport>) = match settings.output.format {
        OutputFormat::Chart => (
            Box::new(HtmlChart::new(settings.output.chart_path_for(&settings.backtest))),
            Some(export),
        ),
        OutputFormat::Csv => (Box::new(export), None),
    };

    match (primary.present(&title, &result.rows), fallback) {
        (Ok(path), _) => println!("{} saved to {}", primary.name(), path.display()),
        (Err(e), Some(fallback)) => {
            tracing::warn!(error = %e, presenter = primary.name(), "Presentation failed; falling back to CSV export.");
            let path = fallback.present(&title, &result.rows)?;
            println!("Chart rendering unavailable. Data saved to {}", path.display());
        }
        (Err(e), None) => return Err(e.into()),
    }

    Ok(())
}

// --- "Fetch" Subcommand Logic ---

/// Handles the logic for the `fetch` subcommand.
async fn handle_fetch(settings: &Settings, output: PathBuf) -> Result<()> {
    settings.validate()?;
    let (symbol, bars) = load_bars(settings).await?;

    presentation::write_bars(&output, &bars)?;
    tracing::info!(symbol = %symbol, count = bars.len(), path = %output.display(), "Bars saved.");
    println!("Saved {} bars for {} to {}", bars.len(), symbol, output.display());

    Ok(())
}
