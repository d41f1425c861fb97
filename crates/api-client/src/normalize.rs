// In crates/api-client/src/normalize.rs

use core_types::Bar;

/// Puts provider bars into the shape the backtest relies on.
///
/// - sorted by date
/// - one bar per date; the last occurrence wins (providers append the
///   in-progress day after the settled one)
/// - bars whose close is not a finite positive number are dropped
pub fn normalize_bars(mut bars: Vec<Bar>) -> Vec<Bar> {
    let before = bars.len();
    bars.retain(|bar| bar.close.is_finite() && bar.close > 0.0);
    let invalid = before - bars.len();
    if invalid > 0 {
        tracing::warn!(dropped = invalid, "Dropped bars with an unusable close price.");
    }

    // Stable sort keeps the provider's order among equal dates.
    bars.sort_by_key(|bar| bar.date);

    let mut normalized: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match normalized.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => normalized.push(bar),
        }
    }

    normalized
}
