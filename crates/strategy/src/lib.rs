pub mod aggregate;
pub mod config;
pub mod indicators;
pub mod registry;
pub mod signal;

pub use aggregate::{into_best, select_best};
pub use config::{StrategyConfig, StrategyFileConfig, StrategyKind};
pub use registry::{build_strategy, StrategyRegistry};
pub use signal::{Bracket, SignalBuilder};

use common::{Candle, Result, Signal};

/// All strategy implementations must satisfy this trait.
///
/// Evaluation is pure: the same candles always produce the same signal, and
/// implementations hold no mutable state, so one instance may be shared
/// across threads.
pub trait Strategy: Send + Sync {
    /// Human-readable name of this strategy instance.
    fn name(&self) -> &str;

    fn kind(&self) -> StrategyKind;

    /// Minimum number of candles needed for a non-neutral signal.
    fn lookback(&self) -> usize;

    /// Evaluate a candle sequence (oldest first). Short or numerically
    /// unusable input yields a zero-confidence HOLD, never an error.
    fn evaluate(&self, candles: &[Candle]) -> Signal;
}

/// Run a single configured strategy against `candles`.
///
/// Configuration problems are errors; data problems are HOLD signals.
pub fn analyze(candles: &[Candle], cfg: &StrategyConfig) -> Result<Signal> {
    Ok(build_strategy(cfg)?.evaluate(candles))
}
