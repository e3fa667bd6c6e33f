use async_trait::async_trait;

use crate::{Candle, Result};

/// Supplier of market data for the signal engine.
///
/// The engine itself never performs I/O; the runner asks a `CandleSource`
/// for data and hands the candles to the strategies.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Recent candles for a trading pair, oldest first.
    async fn candles(&self, pair: &str) -> Result<Vec<Candle>>;

    /// Latest traded price for a trading pair.
    async fn latest_price(&self, pair: &str) -> Result<f64>;
}
