use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use tracing::debug;

use common::{Error, Prediction, Result, Signal, TradeLevels};

/// Outcome of one projection refresh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    /// Price the projection started from.
    pub current_price: f64,
    pub projected_price: f64,
    /// Profit (negative for a loss) on the configured stake, in USD.
    pub profit: f64,
    pub is_profit: bool,
    /// False when no usable live price was supplied and the entry was used.
    pub live: bool,
}

/// Keep a price inside the signal's bracket. BUY signals are bounded by
/// `[stop_loss, take_profit]`, everything else by `[take_profit, stop_loss]`.
pub fn clamp_to_bracket(prediction: Prediction, levels: &TradeLevels, price: f64) -> f64 {
    match prediction {
        Prediction::Buy => levels.stop_loss.max(levels.take_profit.min(price)),
        Prediction::Sell | Prediction::Hold => levels.stop_loss.min(levels.take_profit.max(price)),
    }
}

/// Profit of a position opened at `entry` and marked at `price`.
pub fn profit_on_stake(prediction: Prediction, entry: f64, price: f64, stake_usd: f64) -> f64 {
    match prediction {
        Prediction::Buy => (price - entry) / entry * stake_usd,
        Prediction::Sell | Prediction::Hold => (entry - price) / entry * stake_usd,
    }
}

/// Randomised short-horizon profit estimate for a signal.
///
/// The projected price is the current price shocked by a normal draw with
/// standard deviation `1.5 × volatility`, then clamped into the signal's
/// bracket. The RNG is injected so refreshes can be replayed in tests.
pub struct Projector<R> {
    rng: R,
    stake_usd: f64,
}

impl Projector<StdRng> {
    /// Projector seeded from OS entropy.
    pub fn from_entropy(stake_usd: f64) -> Self {
        Self::new(StdRng::from_entropy(), stake_usd)
    }
}

impl<R: Rng> Projector<R> {
    pub const SPREAD_MULTIPLIER: f64 = 1.5;
    pub const DEFAULT_STAKE_USD: f64 = 1000.0;

    pub fn new(rng: R, stake_usd: f64) -> Self {
        Self { rng, stake_usd }
    }

    pub fn stake_usd(&self) -> f64 {
        self.stake_usd
    }

    /// Project `signal` from `live_price`, falling back to the signal's entry
    /// when the live price is missing or not a positive finite number.
    pub fn project(
        &mut self,
        signal: &Signal,
        live_price: Option<f64>,
        volatility: f64,
    ) -> Result<Projection> {
        let levels = signal.levels.ok_or_else(|| {
            Error::Projection(format!("signal from '{}' has no trade levels", signal.name))
        })?;

        let live = live_price.filter(|p| p.is_finite() && *p > 0.0);
        let current_price = live.unwrap_or(levels.entry);

        if !(volatility.is_finite() && volatility >= 0.0) {
            return Err(Error::Projection(format!(
                "volatility must be a non-negative number, got {volatility}"
            )));
        }
        let std_dev = volatility * Self::SPREAD_MULTIPLIER;
        let normal = Normal::new(0.0, std_dev)
            .map_err(|e| Error::Projection(format!("invalid volatility {volatility}: {e}")))?;
        let shock = normal.sample(&mut self.rng);

        let projected_price =
            clamp_to_bracket(signal.prediction, &levels, current_price * (1.0 + shock));
        let profit = profit_on_stake(signal.prediction, levels.entry, projected_price, self.stake_usd);

        debug!(
            name = %signal.name,
            current = current_price,
            projected = projected_price,
            profit = profit,
            live = live.is_some(),
            "Projection refreshed"
        );

        Ok(Projection {
            current_price,
            projected_price,
            profit,
            is_profit: profit > 0.0,
            live: live.is_some(),
        })
    }
}
