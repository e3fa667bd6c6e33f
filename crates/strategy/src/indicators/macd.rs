use common::{closes, Candle, Prediction, Result, Signal};

use crate::config::StrategyConfig;
use crate::signal::{insufficient_data, Bracket, SignalBuilder};

use super::{latest_time, trailing_mean};

/// MACD (Moving Average Convergence/Divergence) indicator, simplified.
///
/// MACD line = SMA(fast) − SMA(slow), both over the newest candles, and the
/// signal line is a fixed `0.9 × MACD` rather than an EMA of the MACD
/// series. Any positive MACD therefore reads bullish and any negative one
/// bearish; this does not match textbook MACD.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdIndicator {
    pub fast: usize,
    pub slow: usize,
}

/// Intermediate values of one MACD evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdReading {
    pub fast_ma: f64,
    pub slow_ma: f64,
    pub macd: f64,
    pub signal_line: f64,
}

impl MacdIndicator {
    /// Signal line as a fraction of the MACD line.
    pub const SIGNAL_RATIO: f64 = 0.9;

    pub fn new(fast: usize, slow: usize) -> Self {
        assert!(
            fast >= 1 && fast < slow,
            "MACD fast period must be >= 1 and less than slow period"
        );
        Self { fast, slow }
    }

    /// `fastPeriod` and `slowPeriod` are required. `signalPeriod` is accepted
    /// for compatibility with stored configs but does not affect the result.
    pub fn from_config(cfg: &StrategyConfig) -> Result<Self> {
        let fast = cfg.period("fastPeriod")?;
        let slow = cfg.period("slowPeriod")?;
        if cfg.params.contains_key("signalPeriod") {
            cfg.period("signalPeriod")?;
        }
        if fast >= slow {
            return Err(cfg.invalid(
                "fastPeriod",
                format!("{fast} must be less than slowPeriod ({slow})"),
            ));
        }
        Ok(Self::new(fast, slow))
    }

    pub fn lookback(&self) -> usize {
        self.slow
    }

    /// Compute the MACD reading from close prices (oldest first).
    /// Returns `None` if there are fewer than `slow` values.
    pub fn compute(&self, closes: &[f64]) -> Option<MacdReading> {
        if closes.len() < self.slow {
            return None;
        }
        let fast_ma = trailing_mean(closes, self.fast);
        let slow_ma = trailing_mean(closes, self.slow);
        let macd = fast_ma - slow_ma;
        Some(MacdReading {
            fast_ma,
            slow_ma,
            macd,
            signal_line: macd * Self::SIGNAL_RATIO,
        })
    }

    pub fn evaluate(&self, name: &str, candles: &[Candle]) -> Signal {
        let timestamp = latest_time(candles);
        let closes = closes(candles);
        let Some(r) = self.compute(&closes) else {
            return insufficient_data(name, self.slow, candles.len(), timestamp);
        };

        let bullish = r.macd > r.signal_line;
        let prediction = if bullish { Prediction::Buy } else { Prediction::Sell };
        // Left unclamped here: a zero slow average must surface as non-finite.
        let confidence = (r.macd - r.signal_line).abs() / r.slow_ma * 100.0;

        let logic = format!(
            "MACD ({:.4}) is {} signal line ({:.4})",
            r.macd,
            if bullish { "above" } else { "below" },
            r.signal_line
        );

        SignalBuilder::new(name, Bracket::WIDE, timestamp).build(
            prediction,
            confidence,
            logic,
            closes[closes.len() - 1],
        )
    }
}
