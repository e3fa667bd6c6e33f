use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use common::{Error, Result};

/// Largest window length a strategy accepts, in candles.
pub const MAX_PERIOD: u32 = u32::MAX;

/// Top-level strategy config file (TOML).
///
/// Example `config/strategies.toml`:
/// ```toml
/// [[strategy]]
/// type = "rsi"
/// name = "RSI Strategy"
///
/// [strategy.params]
/// period = 14
/// overbought = 70.0
/// oversold = 30.0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StrategyFileConfig {
    #[serde(rename = "strategy", default)]
    pub strategies: Vec<StrategyConfig>,
}

/// Which indicator a strategy entry runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    MovingAverage,
    Rsi,
    Macd,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::MovingAverage => write!(f, "moving_average"),
            StrategyKind::Rsi => write!(f, "rsi"),
            StrategyKind::Macd => write!(f, "macd"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StrategyConfig {
    #[serde(rename = "type")]
    pub kind: StrategyKind,
    /// Human-readable name carried into every signal.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Disabled entries stay in the file but are not registered.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Indicator-specific parameters. Integer values are accepted and widened.
    #[serde(default)]
    pub params: HashMap<String, f64>,
}

fn enabled_by_default() -> bool {
    true
}

impl StrategyConfig {
    pub fn new(kind: StrategyKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: String::new(),
            enabled: true,
            params: HashMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: f64) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Required parameter. A missing key is a configuration error.
    pub fn param(&self, key: &str) -> Result<f64> {
        let value = self.params.get(key).copied().ok_or_else(|| Error::MissingParam {
            strategy: self.name.clone(),
            key: key.to_string(),
        })?;
        if !value.is_finite() {
            return Err(self.invalid(key, format!("{value} is not a finite number")));
        }
        Ok(value)
    }

    /// Required parameter interpreted as a window length in candles.
    pub fn period(&self, key: &str) -> Result<usize> {
        let value = self.param(key)?;
        self.to_period(key, value)
    }

    /// Window length that falls back to `default` only when the key is absent.
    pub fn period_or(&self, key: &str, default: usize) -> Result<usize> {
        if !self.params.contains_key(key) {
            return Ok(default);
        }
        self.period(key)
    }

    pub(crate) fn invalid(&self, key: &str, reason: impl Into<String>) -> Error {
        Error::InvalidParam {
            strategy: self.name.clone(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    fn to_period(&self, key: &str, value: f64) -> Result<usize> {
        if value < 1.0 || value.fract() != 0.0 {
            return Err(self.invalid(key, format!("{value} is not a positive whole number")));
        }
        if value > MAX_PERIOD as f64 {
            return Err(self.invalid(key, format!("{value} exceeds the maximum of {MAX_PERIOD}")));
        }
        Ok(value as usize)
    }
}

impl StrategyFileConfig {
    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read strategy config at '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{msg} (in '{}')", path.display())),
            other => other,
        })
    }

    /// Load from a TOML file, or fall back to [`StrategyFileConfig::defaults`]
    /// when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Strategy config not found, using built-in defaults");
            return Ok(Self::defaults());
        }
        Self::load(path)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse strategy config: {e}")))
    }

    /// The strategy set installed on first run.
    pub fn defaults() -> Self {
        Self {
            strategies: vec![
                StrategyConfig::new(StrategyKind::MovingAverage, "Moving Average")
                    .with_description("Compares current price with moving average")
                    .with_param("period", 14.0),
                StrategyConfig::new(StrategyKind::Rsi, "RSI Strategy")
                    .with_description("Uses RSI to detect overbought/oversold conditions")
                    .with_param("period", 14.0)
                    .with_param("overbought", 70.0)
                    .with_param("oversold", 30.0),
                StrategyConfig::new(StrategyKind::Macd, "MACD Strategy")
                    .with_description("Uses MACD crossovers for signals")
                    .with_param("fastPeriod", 12.0)
                    .with_param("slowPeriod", 26.0)
                    .with_param("signalPeriod", 9.0),
            ],
        }
    }
}
