use rand::Rng;

use common::{Candle, Error, Prediction, Result, Signal, TickerStats};

use crate::projector::clamp_to_bracket;

pub const SIMULATION_STEPS: usize = 5;
pub const STEP_MILLIS: i64 = 60_000;

/// Forward candles for a what-if replay of `signal`, one minute apart from
/// `start_time`.
///
/// Each step drifts the price in the signal's direction (stronger for more
/// confident signals and growing with the step index) plus uniform noise
/// scaled by the 24h price change, and is clamped into the bracket.
pub fn simulate_candles<R: Rng + ?Sized>(
    signal: &Signal,
    ticker: &TickerStats,
    start_time: i64,
    rng: &mut R,
) -> Result<Vec<Candle>> {
    let levels = signal.levels.ok_or_else(|| {
        Error::Projection(format!("signal from '{}' has no trade levels", signal.name))
    })?;
    let volatility = ticker.price_change_percent.abs() / 100.0;
    if !volatility.is_finite() {
        return Err(Error::Projection(format!(
            "invalid 24h price change: {}",
            ticker.price_change_percent
        )));
    }

    let direction = if signal.prediction == Prediction::Buy { 1.0 } else { -1.0 };
    let strategy_impact = signal.confidence / 100.0 * volatility * 0.5;

    let mut price = levels.entry;
    let candles = (0..SIMULATION_STEPS)
        .map(|i| {
            let random_move = rng.gen_range(-1.0f64..1.0) * volatility * 0.5;
            let strategy_move =
                direction * strategy_impact * (i + 1) as f64 / SIMULATION_STEPS as f64;
            let total_move = random_move + strategy_move;

            price = clamp_to_bracket(signal.prediction, &levels, price * (1.0 + total_move));

            Candle {
                time: start_time + i as i64 * STEP_MILLIS,
                open: price,
                high: price * (1.0 + total_move.abs() * 1.2),
                low: price * (1.0 - total_move.abs() * 1.2),
                close: price,
                volume: ticker.volume * 0.2,
            }
        })
        .collect();

    Ok(candles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::TradeLevels;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn buy_signal(confidence: f64) -> Signal {
        Signal {
            name: "MACD Strategy".into(),
            prediction: Prediction::Buy,
            confidence,
            logic: String::new(),
            levels: Some(TradeLevels { entry: 100.0, stop_loss: 98.5, take_profit: 103.0 }),
            timestamp: 0,
        }
    }

    #[test]
    fn produces_five_minute_spaced_candles() {
        let ticker = TickerStats { price_change_percent: 2.0, volume: 500.0 };
        let mut rng = StdRng::seed_from_u64(1);
        let candles = simulate_candles(&buy_signal(80.0), &ticker, 1_000, &mut rng).unwrap();

        assert_eq!(candles.len(), SIMULATION_STEPS);
        for (i, c) in candles.iter().enumerate() {
            assert_eq!(c.time, 1_000 + i as i64 * STEP_MILLIS);
            assert!((98.5..=103.0).contains(&c.close));
            assert!(c.low <= c.close && c.close <= c.high);
            assert_eq!(c.volume, 100.0);
        }
    }

    #[test]
    fn flat_ticker_keeps_the_entry_price() {
        let ticker = TickerStats { price_change_percent: 0.0, volume: 10.0 };
        let mut rng = StdRng::seed_from_u64(3);
        let candles = simulate_candles(&buy_signal(100.0), &ticker, 0, &mut rng).unwrap();
        assert!(candles.iter().all(|c| c.close == 100.0 && c.high == 100.0));
    }

    #[test]
    fn wild_ticker_is_pinned_to_the_bracket() {
        let ticker = TickerStats { price_change_percent: -400.0, volume: 10.0 };
        let mut rng = StdRng::seed_from_u64(9);
        let candles = simulate_candles(&buy_signal(100.0), &ticker, 0, &mut rng).unwrap();
        assert!(candles.iter().all(|c| (98.5..=103.0).contains(&c.close)));
    }

    #[test]
    fn neutral_signal_is_rejected() {
        let ticker = TickerStats { price_change_percent: 1.0, volume: 1.0 };
        let mut rng = StdRng::seed_from_u64(0);
        let neutral = Signal::neutral("RSI", "Not enough data", 0);
        assert!(simulate_candles(&neutral, &ticker, 0, &mut rng).is_err());
    }
}
