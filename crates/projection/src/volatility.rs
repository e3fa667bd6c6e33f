use common::Candle;

/// Used when the sample is too small or numerically unusable.
pub const DEFAULT_VOLATILITY: f64 = 0.01;

/// Number of leading candles the estimate is taken over.
pub const VOLATILITY_WINDOW: usize = 10;

/// Population standard deviation of close-to-close returns over the first
/// `VOLATILITY_WINDOW` candles of the sequence.
pub fn return_volatility(candles: &[Candle]) -> f64 {
    let window = &candles[..candles.len().min(VOLATILITY_WINDOW)];
    if window.len() < 2 {
        return DEFAULT_VOLATILITY;
    }

    let returns: Vec<f64> = window
        .windows(2)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect();
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if std_dev.is_finite() {
        std_dev
    } else {
        DEFAULT_VOLATILITY
    }
}
