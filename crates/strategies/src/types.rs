// In crates/strategies/src/types.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SmaStreakSettings {
    /// Consecutive closes above the SMA required to open a position.
    pub entry_days: u32,
    /// Consecutive closes at or below the SMA required to close it.
    pub exit_days: u32,
}

impl Default for SmaStreakSettings {
    fn default() -> Self {
        Self {
            entry_days: 3,
            exit_days: 3,
        }
    }
}
