pub mod macd;
pub mod moving_average;
pub mod rsi;

pub use macd::MacdIndicator;
pub use moving_average::MovingAverageIndicator;
pub use rsi::RsiIndicator;

use common::Candle;

/// Arithmetic mean of the last `period` values. Caller guarantees
/// `1 <= period <= values.len()`.
pub(crate) fn trailing_mean(values: &[f64], period: usize) -> f64 {
    let window = &values[values.len() - period..];
    window.iter().sum::<f64>() / period as f64
}

/// Timestamp stamped on signals: open time of the newest candle.
pub(crate) fn latest_time(candles: &[Candle]) -> i64 {
    candles.last().map(|c| c.time).unwrap_or(0)
}
