// In crates/backtester/src/lib.rs

pub mod logger;
pub mod types;

use analytics::engine::AnalyticsEngine;
use core_types::{AnnotatedBar, Bar, Error, PositionState, Result, Signal, Symbol};
use strategies::{SmaStreak, Strategy, simple_moving_average};
use tracing::info;

pub use logger::TradeLogger;
pub use types::{BacktestResult, SimulationSettings};

/// The engine for running a historical backtest over one symbol.
///
/// A `Backtester` is built for a single run: `run` consumes it, so the
/// strategy's streak counters and the equity never outlive the pass that
/// produced them.
pub struct Backtester {
    /// The symbol to be tested.
    pub symbol: Symbol,
    /// A single strategy instance to test.
    pub strategy: Box<dyn Strategy + Send>,
    initial_equity: f64,
    logger: TradeLogger,
}

impl Backtester {
    pub fn new(symbol: Symbol, strategy: Box<dyn Strategy + Send>, initial_equity: f64) -> Self {
        Self {
            logger: TradeLogger::new(symbol.clone()),
            symbol,
            strategy,
            initial_equity,
        }
    }

    /// Simulates the strategy over `bars` using a precomputed SMA series.
    ///
    /// The first bar only seeds the equity curve with the initial value. From
    /// the second bar on, the strategy assesses each close against its SMA and
    /// the equity compounds by that bar's return whenever the position is long
    /// after the assessment. A position opened on bar `i` therefore already
    /// earns bar `i`'s return.
    pub fn run(mut self, bars: &[Bar], sma: &[Option<f64>]) -> Result<BacktestResult> {
        let Some(first) = bars.first() else {
            return Err(Error::InsufficientData("cannot simulate an empty price series".into()));
        };
        if sma.len() != bars.len() {
            return Err(Error::SeriesLengthMismatch {
                bars: bars.len(),
                values: sma.len(),
            });
        }

        info!(
            symbol = %self.symbol,
            strategy = self.strategy.name(),
            bars = bars.len(),
            from = %first.date,
            "Starting backtest."
        );

        let mut equity = self.initial_equity;
        let mut bars_in_market = 0usize;
        self.logger.record_equity(first.date, equity);

        for (i, window) in bars.windows(2).enumerate() {
            let (previous, current) = (&window[0], &window[1]);
            let equity_before = equity;

            // --- 1. Let the strategy decide on this bar's close ---
            let signal = self.strategy.assess(current.close, sma[i + 1]);

            // --- 2. Apply this bar's return if we hold the asset now ---
            if self.strategy.position() == PositionState::Long {
                let daily_return = current.close / previous.close - 1.0;
                equity *= 1.0 + daily_return;
                bars_in_market += 1;
            }

            // --- 3. Log transitions ---
            match signal {
                Signal::GoLong => {
                    info!(date = %current.date, close = current.close, sma = ?sma[i + 1], "Entering long position.");
                    self.logger.open_trade(current.date, current.close, equity_before);
                }
                Signal::Close => {
                    info!(date = %current.date, close = current.close, equity, "Exiting position.");
                    self.logger.close_trade(current.date, current.close, equity);
                }
                Signal::Hold => {}
            }

            self.logger.record_equity(current.date, equity);
        }

        let (trades, equity_curve) = self.logger.finish();

        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
        let report = AnalyticsEngine::new().calculate(
            self.initial_equity,
            &closes,
            &trades,
            &equity_curve,
            bars_in_market,
        );

        let rows = bars
            .iter()
            .zip(sma)
            .zip(&equity_curve)
            .map(|((bar, sma), point)| AnnotatedBar {
                bar: bar.clone(),
                sma: *sma,
                equity: point.value,
            })
            .collect();

        info!(
            symbol = %self.symbol,
            final_equity = report.final_equity,
            trades = report.total_trades,
            "Backtest finished."
        );

        Ok(BacktestResult {
            symbol: self.symbol,
            rows,
            equity_curve,
            trades,
            report,
        })
    }
}

/// Computes the SMA for `bars` and runs the SMA streak strategy over them.
///
/// Fewer bars than the window is not an error: the SMA stays undefined, every
/// close counts as "below" and the strategy never enters.
pub fn run_backtest(symbol: Symbol, bars: &[Bar], settings: &SimulationSettings) -> Result<BacktestResult> {
    let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
    let sma = simple_moving_average(&closes, settings.window)?;
    if bars.len() < settings.window {
        tracing::warn!(
            bars = bars.len(),
            window = settings.window,
            "Fewer bars than the SMA window; the moving average is undefined throughout."
        );
    }

    let strategy = Box::new(SmaStreak::new(settings.strategy.clone()));
    Backtester::new(symbol, strategy, settings.initial_investment).run(bars, &sma)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use strategies::SmaStreakSettings;

    fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: start + Days::new(i as u64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 0.0,
            })
            .collect()
    }

    fn backtester(initial: f64) -> Backtester {
        Backtester::new(
            Symbol("TEST".into()),
            Box::new(SmaStreak::new(SmaStreakSettings::default())),
            initial,
        )
    }

    fn equity(result: &BacktestResult) -> Vec<f64> {
        result.equity_curve.iter().map(|p| p.value).collect()
    }

    fn close_to(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn entry_on_third_close_above_compounds_the_same_bar() {
        let closes = [100.0, 101.0, 102.0, 103.0, 104.0, 105.0, 106.0];
        let bars = bars_from_closes(&closes);
        let sma = vec![Some(90.0); closes.len()];

        let result = backtester(1000.0).run(&bars, &sma).unwrap();
        let curve = equity(&result);

        assert_eq!(curve.len(), closes.len());
        assert_eq!(&curve[..3], &[1000.0, 1000.0, 1000.0]);
        assert!(close_to(curve[3], 1000.0 * 103.0 / 102.0));
        for i in 4..closes.len() {
            assert!(close_to(curve[i], curve[i - 1] * closes[i] / closes[i - 1]));
        }
        assert!(close_to(*curve.last().unwrap(), 1000.0 * 106.0 / 102.0));

        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.entry_date, bars[3].date);
        assert_eq!(trade.entry_price, 103.0);
        assert_eq!(trade.entry_equity, 1000.0);
        assert!(!trade.is_closed());
    }

    #[test]
    fn exit_bar_does_not_compound() {
        let closes = [10.0, 11.0, 12.0, 13.0, 9.0, 8.0, 7.0, 6.0];
        let sma = vec![
            Some(5.0),
            Some(5.0),
            Some(5.0),
            Some(5.0),
            Some(10.0),
            Some(10.0),
            Some(10.0),
            Some(10.0),
        ];
        let bars = bars_from_closes(&closes);

        let result = backtester(100.0).run(&bars, &sma).unwrap();
        let curve = equity(&result);

        // Entered at index 3, below the SMA from index 4, exit on index 6.
        let at_entry = 100.0 * 13.0 / 12.0;
        assert!(close_to(curve[3], at_entry));
        assert!(close_to(curve[4], at_entry * 9.0 / 13.0));
        assert!(close_to(curve[5], at_entry * 8.0 / 13.0));
        assert!(close_to(curve[6], curve[5]));
        assert!(close_to(curve[7], curve[5]));

        let trade = &result.trades[0];
        assert_eq!(trade.exit_date, Some(bars[6].date));
        assert_eq!(trade.exit_price, Some(7.0));
        assert!(trade.pnl().unwrap() < 0.0);
        assert_eq!(result.report.closed_trades, 1);
    }

    #[test]
    fn empty_series_is_insufficient_data() {
        let err = backtester(1000.0).run(&[], &[]).unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }

    #[test]
    fn mismatched_sma_is_rejected() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0]);
        let err = backtester(1000.0).run(&bars, &[None, None]).unwrap_err();
        assert_eq!(err, Error::SeriesLengthMismatch { bars: 3, values: 2 });
    }

    #[test]
    fn single_bar_yields_only_the_baseline() {
        let bars = bars_from_closes(&[42.0]);
        let result = backtester(404.0).run(&bars, &[None]).unwrap();
        assert_eq!(equity(&result), vec![404.0]);
        assert!(result.trades.is_empty());
    }

    #[test]
    fn constant_price_never_enters() {
        for price in [100.0, 0.3, 0.6, 1.1, 2.2, 3.3, 7.77, 29.99, 12345.67] {
            let bars = bars_from_closes(&vec![price; 400]);
            let settings = SimulationSettings {
                initial_investment: 404.0,
                ..SimulationSettings::default()
            };

            let result = run_backtest(Symbol("FLAT".into()), &bars, &settings).unwrap();

            assert!(result.rows[199..].iter().all(|row| row.sma == Some(price)), "price {price}");
            assert!(result.rows.iter().all(|row| row.equity == 404.0), "price {price}");
            assert!(result.trades.is_empty(), "price {price}");
            assert_eq!(result.report.exposure_percentage, 0.0);
        }
    }

    #[test]
    fn short_history_degrades_to_undefined_sma() {
        let closes: Vec<f64> = (1..=50).map(f64::from).collect();
        let bars = bars_from_closes(&closes);

        let result = run_backtest(Symbol("SHORT".into()), &bars, &SimulationSettings::default()).unwrap();

        assert!(result.rows.iter().all(|row| row.sma.is_none()));
        assert!(result.rows.iter().all(|row| row.equity == 404.0));
    }

    #[test]
    fn equity_stays_positive_for_positive_prices() {
        let closes: Vec<f64> = (0..600)
            .map(|i| 50.0 + 40.0 * ((i as f64) / 23.0).sin() + (i as f64) * 0.05)
            .collect();
        let bars = bars_from_closes(&closes);
        let settings = SimulationSettings {
            initial_investment: 1000.0,
            window: 20,
            strategy: SmaStreakSettings::default(),
        };

        let result = run_backtest(Symbol("WAVE".into()), &bars, &settings).unwrap();

        assert_eq!(result.rows.len(), closes.len());
        assert!(result.rows.iter().all(|row| row.equity > 0.0));
        assert!(!result.trades.is_empty());
    }

    #[test]
    fn rows_carry_bars_sma_and_equity_by_position() {
        let bars = bars_from_closes(&[10.0, 20.0, 30.0, 40.0]);
        let settings = SimulationSettings {
            initial_investment: 1.0,
            window: 3,
            strategy: SmaStreakSettings::default(),
        };

        let result = run_backtest(Symbol("ROWS".into()), &bars, &settings).unwrap();
        let sma: Vec<Option<f64>> = result.rows.iter().map(|row| row.sma).collect();

        assert_eq!(sma, vec![None, None, Some(20.0), Some(30.0)]);
        assert_eq!(result.rows[2].bar, bars[2]);
    }
}
