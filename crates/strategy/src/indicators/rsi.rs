use common::{closes, Candle, Prediction, Result, Signal};

use crate::config::StrategyConfig;
use crate::signal::{insufficient_data, invalid_data, Bracket, SignalBuilder};

use super::latest_time;

/// RSI (Relative Strength Index) indicator, simplified.
///
/// Gains and losses are plain sums over the first `period` close-to-close
/// changes of the sequence (no Wilder smoothing). When there are no losses
/// the relative strength saturates at 100 instead of going to infinity, so a
/// flat or strictly rising window reads as RSI ≈ 99.01.
#[derive(Debug, Clone, PartialEq)]
pub struct RsiIndicator {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl RsiIndicator {
    /// Relative strength used when the window has no losses.
    pub const SATURATED_RS: f64 = 100.0;

    pub fn new(period: usize, overbought: f64, oversold: f64) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self { period, overbought, oversold }
    }

    /// All three parameters are required; thresholds must satisfy
    /// `0 < oversold < overbought < 100`.
    pub fn from_config(cfg: &StrategyConfig) -> Result<Self> {
        let period = cfg.period("period")?;
        let overbought = cfg.param("overbought")?;
        let oversold = cfg.param("oversold")?;

        if !(oversold > 0.0 && oversold < 100.0) {
            return Err(cfg.invalid("oversold", format!("{oversold} must be within (0, 100)")));
        }
        if !(overbought > oversold && overbought < 100.0) {
            return Err(cfg.invalid(
                "overbought",
                format!("{overbought} must be within ({oversold}, 100)"),
            ));
        }
        Ok(Self::new(period, overbought, oversold))
    }

    pub fn lookback(&self) -> usize {
        self.period.saturating_add(1)
    }

    /// Compute RSI from a slice of close prices (oldest first).
    /// Returns `None` if there are fewer than `period + 1` values.
    pub fn compute(&self, closes: &[f64]) -> Option<f64> {
        if closes.len() < self.lookback() {
            return None;
        }

        let (gains, losses) = closes[..=self.period]
            .windows(2)
            .map(|w| w[1] - w[0])
            .fold((0.0, 0.0), |(gains, losses), change| {
                if change > 0.0 {
                    (gains + change, losses)
                } else {
                    (gains, losses - change)
                }
            });

        let avg_gain = gains / self.period as f64;
        let avg_loss = losses / self.period as f64;
        let rs = if avg_loss == 0.0 { Self::SATURATED_RS } else { avg_gain / avg_loss };
        Some(100.0 - 100.0 / (1.0 + rs))
    }

    pub fn evaluate(&self, name: &str, candles: &[Candle]) -> Signal {
        let timestamp = latest_time(candles);
        let closes = closes(candles);
        let Some(rsi) = self.compute(&closes) else {
            return insufficient_data(name, self.lookback(), candles.len(), timestamp);
        };
        if !rsi.is_finite() {
            return invalid_data(name, timestamp);
        }

        let (prediction, confidence, zone) = if rsi < self.oversold {
            (
                Prediction::Buy,
                (self.oversold - rsi) / self.oversold * 100.0,
                "oversold",
            )
        } else if rsi > self.overbought {
            (
                Prediction::Sell,
                (rsi - self.overbought) / (100.0 - self.overbought) * 100.0,
                "overbought",
            )
        } else {
            (Prediction::Hold, 0.0, "neutral")
        };

        SignalBuilder::new(name, Bracket::STANDARD, timestamp).build(
            prediction,
            confidence,
            format!("RSI ({rsi:.2}) is {zone}"),
            closes[closes.len() - 1],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_util::{approx, candles};
    use crate::StrategyKind;
    use common::Error;

    fn rsi(period: usize) -> RsiIndicator {
        RsiIndicator::new(period, 70.0, 30.0)
    }

    #[test]
    fn rsi_returns_none_when_insufficient_data() {
        // Need at least period+1 = 15 values
        assert!(rsi(14).compute(&[100.0; 14]).is_none());
        let s = rsi(14).evaluate("RSI", &candles(&[100.0; 14]));
        assert_eq!(s.prediction, Prediction::Hold);
        assert_eq!(s.confidence, 0.0);
        assert!(s.levels.is_none());
        assert_eq!(s.logic, "Not enough data (need 15 candles, got 14)");
    }

    #[test]
    fn rising_window_saturates_and_sells() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let value = rsi(14).compute(&prices).unwrap();
        assert!((value - (100.0 - 100.0 / 101.0)).abs() < 1e-9, "got {value}");

        let s = rsi(14).evaluate("RSI", &candles(&prices));
        assert_eq!(s.prediction, Prediction::Sell);
        assert_eq!(s.confidence, 97.0);
        assert_eq!(s.logic, "RSI (99.01) is overbought");
        let levels = s.levels.unwrap();
        assert!(approx(levels.entry, 114.0));
        assert!(approx(levels.stop_loss, 114.0 * 1.01));
        assert!(approx(levels.take_profit, 114.0 * 0.98));
    }

    #[test]
    fn flat_window_also_saturates() {
        let value = rsi(3).compute(&[5.0; 4]).unwrap();
        assert!((value - 99.0099).abs() < 1e-3);
    }

    #[test]
    fn falling_window_is_a_full_confidence_buy() {
        let s = rsi(3).evaluate("RSI", &candles(&[14.0, 13.0, 12.0, 11.0]));
        assert_eq!(s.prediction, Prediction::Buy);
        assert_eq!(s.confidence, 100.0);
        assert_eq!(s.logic, "RSI (0.00) is oversold");
    }

    #[test]
    fn oversold_confidence_scales_with_distance() {
        // gains 1, losses 4 -> rs 0.25 -> rsi 20 -> (30 - 20) / 30 = 33%
        let s = rsi(2).evaluate("RSI", &candles(&[10.0, 6.0, 7.0]));
        assert_eq!(s.prediction, Prediction::Buy);
        assert_eq!(s.confidence, 33.0);
        let levels = s.levels.unwrap();
        assert!(approx(levels.stop_loss, 6.93));
        assert!(approx(levels.take_profit, 7.14));
    }

    #[test]
    fn neutral_rsi_holds_but_keeps_levels() {
        let s = rsi(2).evaluate("RSI", &candles(&[10.0, 11.0, 10.0]));
        assert_eq!(s.prediction, Prediction::Hold);
        assert_eq!(s.confidence, 0.0);
        assert_eq!(s.logic, "RSI (50.00) is neutral");
        let levels = s.levels.unwrap();
        assert!(approx(levels.stop_loss, 10.1));
        assert!(approx(levels.take_profit, 9.8));
    }

    #[test]
    fn only_the_oldest_changes_are_measured() {
        // The crash to 0.5 lies beyond the first two changes.
        let s = rsi(2).evaluate("RSI", &candles(&[10.0, 11.0, 12.0, 0.5]));
        assert_eq!(s.prediction, Prediction::Sell);
        assert!(approx(s.entry().unwrap(), 0.5));
    }

    #[test]
    fn non_finite_prices_are_invalid_data() {
        let s = rsi(2).evaluate("RSI", &candles(&[10.0, f64::NAN, 10.0]));
        assert_eq!(s.prediction, Prediction::Hold);
        assert_eq!(s.logic, "Invalid data received");
    }

    #[test]
    fn config_requires_every_parameter() {
        let cfg = StrategyConfig::new(StrategyKind::Rsi, "RSI")
            .with_param("period", 14.0)
            .with_param("oversold", 30.0);
        let err = RsiIndicator::from_config(&cfg).unwrap_err();
        assert!(matches!(err, Error::MissingParam { ref key, .. } if key == "overbought"));
    }

    #[test]
    fn config_rejects_inverted_thresholds() {
        let cfg = StrategyConfig::new(StrategyKind::Rsi, "RSI")
            .with_param("period", 14.0)
            .with_param("oversold", 70.0)
            .with_param("overbought", 30.0);
        assert!(matches!(
            RsiIndicator::from_config(&cfg),
            Err(Error::InvalidParam { .. })
        ));
    }

    #[test]
    fn largest_period_holds_instead_of_overflowing() {
        let r = rsi(usize::MAX);
        assert_eq!(r.lookback(), usize::MAX);
        let s = r.evaluate("RSI", &candles(&[10.0, 11.0, 12.0]));
        assert_eq!(s.prediction, Prediction::Hold);
        assert_eq!(s.confidence, 0.0);
        assert!(s.logic.starts_with("Not enough data"), "{}", s.logic);
    }
}
