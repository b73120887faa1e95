//! Yahoo Finance chart API types.

use serde::Deserialize;
use serde_json::Value;

/// Response from `/v8/finance/chart/{ticker}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    /// Chart envelope.
    pub chart: Chart,
}

/// Chart envelope: one result or an error object.
#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    /// Series, normally exactly one.
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    /// Error object, e.g. `{"code":"Not Found","description":"..."}`.
    #[serde(default)]
    pub error: Option<Value>,
}

/// One price series.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    /// Series metadata.
    #[serde(default)]
    pub meta: ChartMeta,
    /// Bar open times, Unix seconds.
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    /// OHLCV arrays aligned with `timestamp`.
    #[serde(default)]
    pub indicators: Indicators,
}

/// Series metadata.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    /// Quote currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// Listing exchange code.
    #[serde(default)]
    pub exchange_name: Option<String>,
    /// Exchange offset from UTC, in seconds.
    #[serde(default)]
    pub gmtoffset: Option<i64>,
}

/// Indicator arrays.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Indicators {
    /// Quote arrays, normally exactly one.
    #[serde(default)]
    pub quote: Vec<QuoteIndicator>,
}

/// Daily OHLCV arrays; entries are `null` on halted days.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteIndicator {
    /// Closing prices.
    #[serde(default)]
    pub close: Option<Vec<Option<f64>>>,
}
