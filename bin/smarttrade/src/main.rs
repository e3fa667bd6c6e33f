mod source;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use common::{CandleSource, Config, Error, Result, TickerStats};
use projection::{return_volatility, simulate_candles, Projector};
use strategy::{StrategyFileConfig, StrategyRegistry};

use crate::source::FileCandleSource;

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "SmartTrade stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env()?;
    info!(pair = %cfg.pair, "SmartTrade starting");

    // ── Strategy registry ─────────────────────────────────────────────────────
    let strategy_file = StrategyFileConfig::load_or_default(&cfg.strategy_config_path)?;
    let registry = StrategyRegistry::from_config(&strategy_file)?;
    if registry.is_empty() {
        return Err(Error::NoStrategies);
    }

    // ── Market data ───────────────────────────────────────────────────────────
    let source: Arc<dyn CandleSource> = Arc::new(FileCandleSource::new(&cfg.candles_path));
    let candles = source.candles(&cfg.pair).await?;
    if candles.len() < cfg.min_candles {
        return Err(Error::NotEnoughData {
            need: cfg.min_candles,
            got: candles.len(),
        });
    }
    if let (Some(first), Some(last)) = (candles.first(), candles.last()) {
        info!(
            candles = candles.len(),
            from = ?first.open_time(),
            to = ?last.open_time(),
            "Loaded market data"
        );
    }
    if candles.len() < registry.max_lookback() {
        warn!(
            candles = candles.len(),
            lookback = registry.max_lookback(),
            "Some strategies lack history and will hold"
        );
    }

    // ── Recommendation ────────────────────────────────────────────────────────
    let best = registry.recommend(&candles)?;
    info!(
        name = %best.name,
        prediction = %best.prediction,
        confidence = best.confidence,
        logic = %best.logic,
        "{}",
        best.notification()
    );
    println!("{}", serde_json::to_string_pretty(&best)?);

    if !best.is_actionable() {
        info!("No actionable recommendation; skipping projection");
        return Ok(());
    }
    info!(
        entry = ?best.entry(),
        stop_loss = ?best.stop_loss(),
        take_profit = ?best.take_profit(),
        "Trade levels"
    );

    // ── Simulation (optional) ─────────────────────────────────────────────────
    if let Some(path) = &cfg.ticker_path {
        let ticker = TickerStats::parse(&tokio::fs::read_to_string(path).await?)?;
        let mut rng = StdRng::from_entropy();
        let simulated = simulate_candles(&best, &ticker, Utc::now().timestamp_millis(), &mut rng)?;
        for c in &simulated {
            info!(time = c.time, close = c.close, high = c.high, low = c.low, "Simulated candle");
        }
        println!("{}", serde_json::to_string_pretty(&simulated)?);
    }

    // ── Projection refresh loop ───────────────────────────────────────────────
    let volatility = return_volatility(&candles);
    let mut projector = Projector::from_entropy(cfg.projection_stake_usd);
    let mut interval = tokio::time::interval(Duration::from_secs(cfg.refresh_interval_secs));
    info!(
        volatility = volatility,
        every_secs = cfg.refresh_interval_secs,
        stake_usd = projector.stake_usd(),
        "Projection refresh started. Press Ctrl-C to stop."
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let live = match source.latest_price(&cfg.pair).await {
                    Ok(price) => Some(price),
                    Err(e) => {
                        warn!(error = %e, "Live price unavailable, projecting from entry");
                        None
                    }
                };
                let p = projector.project(&best, live, volatility)?;
                info!(
                    current = p.current_price,
                    projected = p.projected_price,
                    live = p.live,
                    "5-min projection: {} of ${:.2}",
                    if p.is_profit { "Profit" } else { "Loss" },
                    p.profit.abs()
                );
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received. Exiting.");
                return Ok(());
            }
        }
    }
}
