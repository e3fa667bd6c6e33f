use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV interval. Sequences are always ordered oldest to newest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket open time in epoch milliseconds.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Open time as a UTC datetime, if the millisecond value is representable.
    pub fn open_time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.time).single()
    }
}

/// Closing prices of a candle slice, oldest first.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Direction recommended by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Prediction {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Prediction::Buy => write!(f, "BUY"),
            Prediction::Sell => write!(f, "SELL"),
            Prediction::Hold => write!(f, "HOLD"),
        }
    }
}

/// Suggested entry and exit prices attached to a signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeLevels {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// Result of evaluating one strategy against a candle sequence.
///
/// A fresh value per evaluation with no identity of its own. `levels` is
/// `None` only for the neutral HOLD produced when the data was too short or
/// numerically unusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    /// Name of the strategy that produced this signal.
    pub name: String,
    pub prediction: Prediction,
    /// Heuristic score in `[0, 100]`, always a whole number.
    pub confidence: f64,
    /// Human-readable rationale.
    pub logic: String,
    #[serde(flatten)]
    pub levels: Option<TradeLevels>,
    /// Time of the newest candle evaluated, epoch milliseconds.
    pub timestamp: i64,
}

impl Signal {
    /// Neutral HOLD with zero confidence and no trade levels.
    pub fn neutral(name: impl Into<String>, logic: impl Into<String>, timestamp: i64) -> Self {
        Self {
            name: name.into(),
            prediction: Prediction::Hold,
            confidence: 0.0,
            logic: logic.into(),
            levels: None,
            timestamp,
        }
    }

    pub fn entry(&self) -> Option<f64> {
        self.levels.map(|l| l.entry)
    }

    pub fn stop_loss(&self) -> Option<f64> {
        self.levels.map(|l| l.stop_loss)
    }

    pub fn take_profit(&self) -> Option<f64> {
        self.levels.map(|l| l.take_profit)
    }

    /// True for BUY or SELL signals that carry trade levels.
    pub fn is_actionable(&self) -> bool {
        self.prediction != Prediction::Hold && self.levels.is_some()
    }

    /// Alert text shown to the user for a recommendation.
    pub fn notification(&self) -> String {
        format!(
            "Recommendation: {} ({}% confidence)",
            self.prediction, self.confidence
        )
    }
}
