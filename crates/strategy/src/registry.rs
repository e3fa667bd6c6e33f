use tracing::{debug, info};

use common::{Candle, Result, Signal};

use crate::aggregate::into_best;
use crate::config::{StrategyConfig, StrategyFileConfig, StrategyKind};
use crate::indicators::{MacdIndicator, MovingAverageIndicator, RsiIndicator};
use crate::Strategy;

/// Holds the enabled strategy instances in file order.
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn Strategy>>,
}

impl StrategyRegistry {
    /// Build the registry from config. Disabled entries are skipped; any
    /// invalid parameter set fails the whole build.
    pub fn from_config(file_cfg: &StrategyFileConfig) -> Result<Self> {
        let mut strategies: Vec<Box<dyn Strategy>> = Vec::new();

        for cfg in file_cfg.strategies.iter().filter(|c| c.enabled) {
            let strategy = build_strategy(cfg)?;
            info!(
                name = %strategy.name(),
                kind = %strategy.kind(),
                lookback = strategy.lookback(),
                "Registered strategy"
            );
            strategies.push(strategy);
        }

        Ok(Self { strategies })
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.strategies.iter().map(|s| s.name())
    }

    /// Longest lookback of any registered strategy (0 when empty).
    pub fn max_lookback(&self) -> usize {
        self.strategies.iter().map(|s| s.lookback()).max().unwrap_or(0)
    }

    /// One signal per registered strategy, in registration order.
    pub fn evaluate(&self, candles: &[Candle]) -> Vec<Signal> {
        self.strategies
            .iter()
            .map(|s| {
                let signal = s.evaluate(candles);
                debug!(
                    name = %signal.name,
                    prediction = %signal.prediction,
                    confidence = signal.confidence,
                    logic = %signal.logic,
                    "Strategy evaluated"
                );
                signal
            })
            .collect()
    }

    /// The most confident signal across all strategies.
    pub fn recommend(&self, candles: &[Candle]) -> Result<Signal> {
        into_best(self.evaluate(candles))
    }
}

// ─── Strategy builders ────────────────────────────────────────────────────────

/// Validate a config entry and turn it into a runnable strategy.
pub fn build_strategy(cfg: &StrategyConfig) -> Result<Box<dyn Strategy>> {
    let strategy: Box<dyn Strategy> = match cfg.kind {
        StrategyKind::MovingAverage => Box::new(MovingAverageStrategy {
            name: cfg.name.clone(),
            indicator: MovingAverageIndicator::from_config(cfg)?,
        }),
        StrategyKind::Rsi => Box::new(RsiStrategy {
            name: cfg.name.clone(),
            indicator: RsiIndicator::from_config(cfg)?,
        }),
        StrategyKind::Macd => Box::new(MacdStrategy {
            name: cfg.name.clone(),
            indicator: MacdIndicator::from_config(cfg)?,
        }),
    };
    Ok(strategy)
}

// ─── Concrete strategy types ──────────────────────────────────────────────────

struct MovingAverageStrategy {
    name: String,
    indicator: MovingAverageIndicator,
}

impl Strategy for MovingAverageStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::MovingAverage
    }

    fn lookback(&self) -> usize {
        self.indicator.lookback()
    }

    fn evaluate(&self, candles: &[Candle]) -> Signal {
        self.indicator.evaluate(&self.name, candles)
    }
}

struct RsiStrategy {
    name: String,
    indicator: RsiIndicator,
}

impl Strategy for RsiStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Rsi
    }

    fn lookback(&self) -> usize {
        self.indicator.lookback()
    }

    fn evaluate(&self, candles: &[Candle]) -> Signal {
        self.indicator.evaluate(&self.name, candles)
    }
}

struct MacdStrategy {
    name: String,
    indicator: MacdIndicator,
}

impl Strategy for MacdStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Macd
    }

    fn lookback(&self) -> usize {
        self.indicator.lookback()
    }

    fn evaluate(&self, candles: &[Candle]) -> Signal {
        self.indicator.evaluate(&self.name, candles)
    }
}
