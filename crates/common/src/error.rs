use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Strategy '{strategy}' is missing required parameter '{key}'")]
    MissingParam { strategy: String, key: String },

    #[error("Strategy '{strategy}' has invalid parameter '{key}': {reason}")]
    InvalidParam {
        strategy: String,
        key: String,
        reason: String,
    },

    #[error("No strategies available")]
    NoStrategies,

    #[error("Not enough data received (need {need} candles, got {got})")]
    NotEnoughData { need: usize, got: usize },

    #[error("Kline parse error: {0}")]
    Kline(String),

    #[error("Projection error: {0}")]
    Projection(String),

    #[error("Candle source error: {0}")]
    Source(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
