use serde::Deserialize;
use serde_json::Value;

use crate::{Candle, Error, Result};

// ─── Binance REST kline parsing ──────────────────────────────────────────────

/// Parse the body of `GET /api/v3/klines` into candles, oldest first.
///
/// Each row is `[openTime, "open", "high", "low", "close", "volume", closeTime, ...]`.
/// Price fields arrive as decimal strings; plain JSON numbers are accepted too.
pub fn parse_klines(text: &str) -> Result<Vec<Candle>> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(text)?;
    rows.iter()
        .enumerate()
        .map(|(i, row)| parse_row(row).map_err(|e| Error::Kline(format!("row {i}: {e}"))))
        .collect()
}

fn parse_row(row: &[Value]) -> std::result::Result<Candle, String> {
    if row.len() < 6 {
        return Err(format!("expected at least 6 fields, got {}", row.len()));
    }
    let time = row[0]
        .as_i64()
        .ok_or_else(|| format!("open time is not an integer: {}", row[0]))?;

    Ok(Candle {
        time,
        open: number(&row[1], "open")?,
        high: number(&row[2], "high")?,
        low: number(&row[3], "low")?,
        close: number(&row[4], "close")?,
        volume: number(&row[5], "volume")?,
    })
}

fn number(value: &Value, field: &str) -> std::result::Result<f64, String> {
    match value {
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| format!("{field} is not numeric: '{s}'")),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("{field} is out of range: {n}")),
        other => Err(format!("{field} has unexpected type: {other}")),
    }
}

/// Subset of the 24h ticker (`GET /api/v3/ticker/24hr`) used for simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickerStats {
    /// 24h price change in percent, e.g. `-1.25`.
    pub price_change_percent: f64,
    /// 24h traded volume in base asset units.
    pub volume: f64,
}

#[derive(Deserialize)]
struct RawTicker {
    #[serde(rename = "priceChangePercent")]
    price_change_percent: Value,
    volume: Value,
}

impl TickerStats {
    pub fn parse(text: &str) -> Result<Self> {
        let raw: RawTicker = serde_json::from_str(text)?;
        Ok(Self {
            price_change_percent: number(&raw.price_change_percent, "priceChangePercent")
                .map_err(Error::Kline)?,
            volume: number(&raw.volume, "volume").map_err(Error::Kline)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_binance_rest_rows() {
        let body = r#"[
            [1499040000000, "0.01634790", "0.80000000", "0.01575800", "0.01577100", "148976.11427815", 1499644799999, "2434.19", 308, "1756.87", "28.46", "0"],
            [1499040001000, "0.01577100", "0.01600000", "0.01570000", "0.01590000", "10.5", 1499644800999, "1", 2, "1", "1", "0"]
        ]"#;
        let candles = parse_klines(body).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].time, 1_499_040_000_000);
        assert!((candles[0].close - 0.015771).abs() < 1e-12);
        assert!((candles[1].volume - 10.5).abs() < 1e-12);
    }

    #[test]
    fn accepts_numeric_price_fields() {
        let body = "[[1, 1.5, 2.0, 1.0, 1.75, 100]]";
        let candles = parse_klines(body).unwrap();
        assert_eq!(candles[0].close, 1.75);
    }

    #[test]
    fn rejects_short_rows() {
        let err = parse_klines(r#"[[1, "1", "2"]]"#).unwrap_err();
        assert!(matches!(err, Error::Kline(_)), "unexpected error: {err}");
    }

    #[test]
    fn rejects_non_numeric_prices() {
        let err = parse_klines(r#"[[1, "1", "2", "0.5", "abc", "3"]]"#).unwrap_err();
        assert!(err.to_string().contains("close"));
    }

    #[test]
    fn rejects_non_array_body() {
        assert!(matches!(
            parse_klines(r#"{"code": -1121}"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn parses_ticker_stats() {
        let stats =
            TickerStats::parse(r#"{"symbol":"BTCUSDT","priceChangePercent":"-2.50","volume":"1200.0"}"#)
                .unwrap();
        assert_eq!(stats.price_change_percent, -2.5);
        assert_eq!(stats.volume, 1200.0);
    }
}
