//! Result shaping shared by every strategy: confidence rounding and the
//! stop-loss / take-profit bracket around the latest close.

use common::{Prediction, Signal, TradeLevels};

/// Distances of the stop-loss and take-profit from the entry, as fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub stop: f64,
    pub target: f64,
}

impl Bracket {
    /// 1% stop, 2% target. Used by the moving-average and RSI strategies.
    pub const STANDARD: Bracket = Bracket { stop: 0.01, target: 0.02 };
    /// 1.5% stop, 3% target. MACD lags, so it gets more room.
    pub const WIDE: Bracket = Bracket { stop: 0.015, target: 0.03 };

    /// Levels around `entry`. Anything other than BUY is bracketed as a short.
    pub fn levels(&self, prediction: Prediction, entry: f64) -> TradeLevels {
        let (stop, target) = match prediction {
            Prediction::Buy => (1.0 - self.stop, 1.0 + self.target),
            Prediction::Sell | Prediction::Hold => (1.0 + self.stop, 1.0 - self.target),
        };
        TradeLevels {
            entry,
            stop_loss: entry * stop,
            take_profit: entry * target,
        }
    }
}

/// Clamp to `[0, 100]` and round to the nearest whole number.
pub fn round_confidence(raw: f64) -> f64 {
    raw.clamp(0.0, 100.0).round()
}

pub(crate) fn insufficient_data(name: &str, need: usize, got: usize, timestamp: i64) -> Signal {
    Signal::neutral(
        name,
        format!("Not enough data (need {need} candles, got {got})"),
        timestamp,
    )
}

pub(crate) fn invalid_data(name: &str, timestamp: i64) -> Signal {
    Signal::neutral(name, "Invalid data received", timestamp)
}

/// Assembles a priced signal from a strategy's raw outputs.
#[derive(Debug, Clone)]
pub struct SignalBuilder<'a> {
    name: &'a str,
    bracket: Bracket,
    timestamp: i64,
}

impl<'a> SignalBuilder<'a> {
    pub fn new(name: &'a str, bracket: Bracket, timestamp: i64) -> Self {
        Self { name, bracket, timestamp }
    }

    /// Final signal, or the invalid-data HOLD when `raw_confidence` or
    /// `last_close` is not finite.
    pub fn build(
        &self,
        prediction: Prediction,
        raw_confidence: f64,
        logic: String,
        last_close: f64,
    ) -> Signal {
        if !raw_confidence.is_finite() || !last_close.is_finite() {
            return invalid_data(self.name, self.timestamp);
        }
        Signal {
            name: self.name.to_string(),
            prediction,
            confidence: round_confidence(raw_confidence),
            logic,
            levels: Some(self.bracket.levels(prediction, last_close)),
            timestamp: self.timestamp,
        }
    }
}
