use common::{closes, Candle, Prediction, Result, Signal};

use crate::config::StrategyConfig;
use crate::signal::{insufficient_data, invalid_data, Bracket, SignalBuilder};

use super::{latest_time, trailing_mean};

/// Price versus simple moving average of the close.
///
/// BUY when the latest close sits above the `period`-candle average, SELL
/// otherwise (an exact tie is a SELL). Confidence is twice the percentage
/// deviation, capped at 100.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverageIndicator {
    pub period: usize,
}

impl MovingAverageIndicator {
    pub const DEFAULT_PERIOD: usize = 14;

    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "moving average period must be >= 1");
        Self { period }
    }

    /// `period` defaults to 14 when the key is absent.
    pub fn from_config(cfg: &StrategyConfig) -> Result<Self> {
        Ok(Self::new(cfg.period_or("period", Self::DEFAULT_PERIOD)?))
    }

    pub fn lookback(&self) -> usize {
        self.period
    }

    /// Mean close over the last `period` candles, `None` when too short.
    pub fn compute(&self, closes: &[f64]) -> Option<f64> {
        if closes.len() < self.period {
            return None;
        }
        Some(trailing_mean(closes, self.period))
    }

    pub fn evaluate(&self, name: &str, candles: &[Candle]) -> Signal {
        let timestamp = latest_time(candles);
        let closes = closes(candles);
        let Some(avg) = self.compute(&closes) else {
            return insufficient_data(name, self.period, candles.len(), timestamp);
        };
        let last_close = closes[closes.len() - 1];

        if !avg.is_finite() || !last_close.is_finite() {
            return invalid_data(name, timestamp);
        }

        let price_diff = last_close - avg;
        let percent_diff = price_diff.abs() / avg * 100.0;
        if !percent_diff.is_finite() {
            return invalid_data(name, timestamp);
        }
        let prediction = if price_diff > 0.0 { Prediction::Buy } else { Prediction::Sell };

        let logic = format!(
            "Price is {:.2}% {} {}-period MA ({:.2})",
            percent_diff,
            if price_diff > 0.0 { "above" } else { "below" },
            self.period,
            avg
        );

        SignalBuilder::new(name, Bracket::STANDARD, timestamp).build(
            prediction,
            (percent_diff * 2.0).min(100.0),
            logic,
            last_close,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_util::{approx, candles};
    use crate::StrategyKind;

    #[test]
    fn holds_when_shorter_than_period() {
        let ma = MovingAverageIndicator::new(14);
        let s = ma.evaluate("MA", &candles(&[1.0; 13]));
        assert_eq!(s.prediction, Prediction::Hold);
        assert_eq!(s.confidence, 0.0);
        assert!(s.levels.is_none());
        assert_eq!(s.logic, "Not enough data (need 14 candles, got 13)");
    }

    #[test]
    fn jump_above_average_is_a_full_confidence_buy() {
        let mut prices = vec![1.0; 13];
        prices.push(2.0);
        let s = MovingAverageIndicator::new(14).evaluate("MA", &candles(&prices));

        assert_eq!(s.prediction, Prediction::Buy);
        assert_eq!(s.confidence, 100.0);
        let levels = s.levels.unwrap();
        assert!(approx(levels.entry, 2.0));
        assert!(approx(levels.stop_loss, 1.98));
        assert!(approx(levels.take_profit, 2.04));
        assert_eq!(s.logic, "Price is 86.67% above 14-period MA (1.07)");
    }

    #[test]
    fn close_below_average_sells_with_scaled_confidence() {
        // avg = 101, last = 99 -> 1.98% below -> confidence round(3.96) = 4
        let s = MovingAverageIndicator::new(3).evaluate("MA", &candles(&[102.0, 102.0, 99.0]));
        assert_eq!(s.prediction, Prediction::Sell);
        assert_eq!(s.confidence, 4.0);
        let levels = s.levels.unwrap();
        assert!(approx(levels.stop_loss, 99.0 * 1.01));
        assert!(approx(levels.take_profit, 99.0 * 0.98));
    }

    #[test]
    fn exact_tie_resolves_to_sell() {
        let s = MovingAverageIndicator::new(4).evaluate("MA", &candles(&[5.0; 4]));
        assert_eq!(s.prediction, Prediction::Sell);
        assert_eq!(s.confidence, 0.0);
        assert!(s.logic.contains("below"));
    }

    #[test]
    fn only_the_trailing_window_counts() {
        // The 1000.0 falls outside the 3-candle window.
        let s = MovingAverageIndicator::new(3).evaluate("MA", &candles(&[1000.0, 10.0, 10.0, 10.0]));
        assert_eq!(s.prediction, Prediction::Sell);
        assert_eq!(s.confidence, 0.0);
    }

    #[test]
    fn non_finite_close_is_invalid_data() {
        let s = MovingAverageIndicator::new(2).evaluate("MA", &candles(&[1.0, f64::NAN]));
        assert_eq!(s.prediction, Prediction::Hold);
        assert_eq!(s.logic, "Invalid data received");
        assert!(s.levels.is_none());
    }

    #[test]
    fn zero_average_is_invalid_data() {
        let s = MovingAverageIndicator::new(2).evaluate("MA", &candles(&[0.0, 0.0]));
        assert_eq!(s.prediction, Prediction::Hold);
        assert_eq!(s.logic, "Invalid data received");
    }

    #[test]
    fn period_defaults_to_fourteen() {
        let cfg = StrategyConfig::new(StrategyKind::MovingAverage, "MA");
        assert_eq!(MovingAverageIndicator::from_config(&cfg).unwrap().period, 14);
    }

    #[test]
    fn signal_is_stamped_with_newest_candle_time() {
        let data = candles(&[1.0, 2.0, 3.0]);
        let s = MovingAverageIndicator::new(2).evaluate("MA", &data);
        assert_eq!(s.timestamp, data[2].time);
    }
}
