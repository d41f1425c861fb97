// In crates/strategies/src/sma_streak.rs

use crate::types::SmaStreakSettings;
use crate::{Signal, Strategy};
use core_types::PositionState;

/// Trend-following rule over consecutive closes relative to a moving average.
///
/// A position is opened after `entry_days` consecutive closes strictly above
/// the SMA and closed after `exit_days` consecutive closes that are not. A
/// close with no SMA value yet counts as "not above".
#[derive(Debug)]
pub struct SmaStreak {
    /// The configuration for this strategy instance.
    settings: SmaStreakSettings,
    /// Uninterrupted closes above the SMA, including the latest one.
    consecutive_above: u32,
    /// Uninterrupted closes at or below the SMA (or without one).
    consecutive_below: u32,
    position: PositionState,
}

impl SmaStreak {
    /// Creates a new, flat `SmaStreak` strategy instance from its settings.
    pub fn new(settings: SmaStreakSettings) -> Self {
        Self {
            settings,
            consecutive_above: 0,
            consecutive_below: 0,
            position: PositionState::Flat,
        }
    }

    pub fn consecutive_above(&self) -> u32 {
        self.consecutive_above
    }

    pub fn consecutive_below(&self) -> u32 {
        self.consecutive_below
    }
}

impl Strategy for SmaStreak {
    fn name(&self) -> &'static str {
        "SmaStreak"
    }

    fn assess(&mut self, close: f64, sma: Option<f64>) -> Signal {
        // 1. Extend the streak on the side of the SMA this close landed on.
        match sma {
            Some(average) if close > average => {
                self.consecutive_above = self.consecutive_above.saturating_add(1);
                self.consecutive_below = 0;
            }
            _ => {
                self.consecutive_below = self.consecutive_below.saturating_add(1);
                self.consecutive_above = 0;
            }
        }

        tracing::debug!(
            close,
            ?sma,
            above = self.consecutive_above,
            below = self.consecutive_below,
            "Streak updated"
        );

        // 2. Entry and exit test opposite states, so at most one can fire.
        match self.position {
            PositionState::Flat if self.consecutive_above >= self.settings.entry_days => {
                self.position = PositionState::Long;
                Signal::GoLong
            }
            PositionState::Long if self.consecutive_below >= self.settings.exit_days => {
                self.position = PositionState::Flat;
                Signal::Close
            }
            _ => Signal::Hold,
        }
    }

    fn position(&self) -> PositionState {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy() -> SmaStreak {
        SmaStreak::new(SmaStreakSettings::default())
    }

    #[test]
    fn third_close_above_opens_the_position() {
        let mut s = strategy();
        assert_eq!(s.assess(101.0, Some(100.0)), Signal::Hold);
        assert_eq!(s.assess(102.0, Some(100.0)), Signal::Hold);
        assert_eq!(s.position(), PositionState::Flat);
        assert_eq!(s.assess(103.0, Some(100.0)), Signal::GoLong);
        assert_eq!(s.position(), PositionState::Long);
        // Staying above does not re-enter.
        assert_eq!(s.assess(104.0, Some(100.0)), Signal::Hold);
        assert_eq!(s.consecutive_above(), 4);
    }

    #[test]
    fn third_close_below_closes_the_position() {
        let mut s = strategy();
        for _ in 0..3 {
            s.assess(110.0, Some(100.0));
        }
        assert_eq!(s.position(), PositionState::Long);
        assert_eq!(s.assess(90.0, Some(100.0)), Signal::Hold);
        assert_eq!(s.assess(90.0, Some(100.0)), Signal::Hold);
        assert_eq!(s.assess(90.0, Some(100.0)), Signal::Close);
        assert_eq!(s.position(), PositionState::Flat);
    }

    #[test]
    fn interrupted_streak_starts_over() {
        let mut s = strategy();
        s.assess(110.0, Some(100.0));
        s.assess(110.0, Some(100.0));
        s.assess(90.0, Some(100.0));
        assert_eq!(s.consecutive_above(), 0);
        assert_eq!(s.consecutive_below(), 1);
        s.assess(110.0, Some(100.0));
        s.assess(110.0, Some(100.0));
        assert_eq!(s.position(), PositionState::Flat);
        assert_eq!(s.assess(110.0, Some(100.0)), Signal::GoLong);
    }

    #[test]
    fn missing_sma_and_equality_count_as_below() {
        let mut s = strategy();
        s.assess(100.0, None);
        s.assess(100.0, Some(100.0));
        assert_eq!(s.consecutive_below(), 2);
        assert_eq!(s.consecutive_above(), 0);
    }

    #[test]
    fn exactly_one_counter_is_nonzero_after_each_bar() {
        let mut s = strategy();
        let inputs = [
            (1.0, None),
            (5.0, Some(4.0)),
            (3.0, Some(4.0)),
            (4.0, Some(4.0)),
            (9.0, Some(4.0)),
        ];
        for (close, sma) in inputs {
            s.assess(close, sma);
            assert!((s.consecutive_above() == 0) ^ (s.consecutive_below() == 0));
        }
    }

    #[test]
    fn custom_streak_lengths_are_honoured() {
        let mut s = SmaStreak::new(SmaStreakSettings {
            entry_days: 1,
            exit_days: 2,
        });
        assert_eq!(s.assess(2.0, Some(1.0)), Signal::GoLong);
        assert_eq!(s.assess(0.5, Some(1.0)), Signal::Hold);
        assert_eq!(s.assess(0.5, Some(1.0)), Signal::Close);
    }
}
