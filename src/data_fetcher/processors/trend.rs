use crate::data_fetcher::models::{Trend, TrendDirection};

/// Trend from a chronological rating history (oldest first).
///
/// Uses the sign of the last delta; fewer than two entries is stable.
pub fn trend_from_history(ratings: &[i64]) -> Trend {
    let [.., previous, latest] = ratings else {
        return Trend::stable();
    };
    let delta = latest - previous;
    let direction = match delta.signum() {
        1 => TrendDirection::Up,
        -1 => TrendDirection::Down,
        _ => TrendDirection::Stable,
    };
    Trend { direction, delta }
}
