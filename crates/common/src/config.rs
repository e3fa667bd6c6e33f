use crate::{Error, Result};

/// Runtime configuration loaded from environment variables at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Binance kline JSON file the runner reads candles from.
    pub candles_path: String,
    /// Trading pair being analysed, e.g. "BTCUSDT".
    pub pair: String,
    /// Strategy definitions (TOML). Built-in defaults apply when absent.
    pub strategy_config_path: String,
    /// Seconds between projection refreshes.
    pub refresh_interval_secs: u64,
    /// Notional stake the projected profit is quoted against.
    pub projection_stake_usd: f64,
    /// Fewer fetched candles than this aborts the analysis.
    pub min_candles: usize,
    /// Optional 24h ticker JSON; when set, simulated forward candles are printed.
    pub ticker_path: Option<String>,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let pair = optional_env("PAIR").unwrap_or_else(|| "BTCUSDT".to_string());
        if !pair.to_uppercase().contains("USDT") {
            return Err(Error::Config(format!(
                "PAIR must be a USDT trading pair, got: '{pair}'"
            )));
        }

        let projection_stake_usd = positive_env("PROJECTION_STAKE_USD", 1000.0)?;

        Ok(Config {
            candles_path: required_env("CANDLES_PATH")?,
            pair,
            strategy_config_path: optional_env("STRATEGY_CONFIG_PATH")
                .unwrap_or_else(|| "config/strategies.toml".to_string()),
            refresh_interval_secs: parsed_env("REFRESH_INTERVAL_SECS", 5)?.max(1),
            projection_stake_usd,
            min_candles: parsed_env("MIN_CANDLES", 15)?,
            ticker_path: optional_env("TICKER_PATH"),
        })
    }
}

fn required_env(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        Error::Config(format!(
            "Required environment variable '{key}' is not set. Check your .env file."
        ))
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parsed_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{key} has invalid value '{raw}': {e}"))),
        None => Ok(default),
    }
}

fn positive_env(key: &str, default: f64) -> Result<f64> {
    let value: f64 = parsed_env(key, default)?;
    if !(value.is_finite() && value > 0.0) {
        return Err(Error::Config(format!(
            "{key} must be a positive number, got: {value}"
        )));
    }
    Ok(value)
}
