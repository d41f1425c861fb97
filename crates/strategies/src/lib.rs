// In crates/strategies/src/lib.rs

use core_types::{PositionState, Signal};
pub mod sma;
pub mod sma_streak;
pub mod types;

pub use sma::simple_moving_average;
pub use sma_streak::SmaStreak;
pub use types::SmaStreakSettings;

/// The universal interface for a trading strategy.
///
/// A strategy is fed one bar at a time, in chronological order, and decides
/// whether the position should change on that bar. It is a stateful entity:
/// it keeps whatever counters it needs across calls and owns the current
/// position state.
pub trait Strategy {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    /// Assesses a bar's close against its moving average value.
    ///
    /// `sma` is `None` while the moving average is still warming up.
    fn assess(&mut self, close: f64, sma: Option<f64>) -> Signal;

    /// The position held after the most recent assessment.
    fn position(&self) -> PositionState;
}
