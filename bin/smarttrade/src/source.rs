use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use common::{parse_klines, Candle, CandleSource, Error, Result};

/// Candle source backed by a Binance kline JSON dump on disk.
///
/// The file is re-read on every call so an external poller can keep
/// overwriting it with fresh data. It holds a single pair's history.
pub struct FileCandleSource {
    path: PathBuf,
}

impl FileCandleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CandleSource for FileCandleSource {
    async fn candles(&self, pair: &str) -> Result<Vec<Candle>> {
        let body = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::Source(format!("failed to read '{}': {e}", self.path.display()))
        })?;
        let candles = parse_klines(&body)?;
        debug!(pair = %pair, count = candles.len(), path = %self.path.display(), "Candles loaded");
        Ok(candles)
    }

    async fn latest_price(&self, pair: &str) -> Result<f64> {
        self.candles(pair)
            .await?
            .last()
            .map(|c| c.close)
            .ok_or_else(|| Error::Source(format!("no candles available for {pair}")))
    }
}
