//! Nasdaq API response types.
//!
//! These types map the subset of `api.nasdaq.com` payloads we read. Numeric
//! fields arrive as numbers or display strings (`"$82.20"`, `"1,250"`), and
//! `"--"`, `"N/A"`, `""` or `null` mean no value.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// ============================================================================
// Envelope
// ============================================================================

/// Top-level response wrapper shared by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NasdaqEnvelope<T> {
    /// Payload; `null` when the symbol is unknown.
    pub data: Option<T>,
    /// Error text accompanying a `null` payload.
    #[serde(default)]
    pub message: Option<Value>,
}

impl<T> NasdaqEnvelope<T> {
    /// Human-readable reason for a missing payload.
    #[must_use]
    pub fn message_text(&self) -> String {
        match &self.message {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Null) | None => "no message".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

// ============================================================================
// Option Chain
// ============================================================================

/// `data` of `/api/quote/{ticker}/option-chain`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChainData {
    /// Display string such as `"LAST TRADE: $82.2 (AS OF FEB 6, 2026)"`.
    #[serde(default)]
    pub last_trade: Option<String>,
    /// Chain table; absent when the symbol has no listed options.
    #[serde(default)]
    pub table: Option<ChainTable>,
}

/// Table of chain rows.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainTable {
    /// Rows; group headers interleaved with strike rows.
    #[serde(default)]
    pub rows: Option<Vec<ChainRow>>,
}

/// One chain row: an expiry group header or a strike row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChainRow {
    /// Non-empty on group headers, e.g. `"February 13, 2026"`.
    #[serde(default)]
    pub expirygroup: Option<String>,
    /// Strike price.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub strike: Option<Decimal>,
    /// Call bid.
    #[serde(default, rename = "c_Bid", deserialize_with = "lenient_decimal")]
    pub c_bid: Option<Decimal>,
    /// Call ask.
    #[serde(default, rename = "c_Ask", deserialize_with = "lenient_decimal")]
    pub c_ask: Option<Decimal>,
    /// Call last trade.
    #[serde(default, rename = "c_Last", deserialize_with = "lenient_decimal")]
    pub c_last: Option<Decimal>,
    /// Put bid.
    #[serde(default, rename = "p_Bid", deserialize_with = "lenient_decimal")]
    pub p_bid: Option<Decimal>,
    /// Put ask.
    #[serde(default, rename = "p_Ask", deserialize_with = "lenient_decimal")]
    pub p_ask: Option<Decimal>,
    /// Put last trade.
    #[serde(default, rename = "p_Last", deserialize_with = "lenient_decimal")]
    pub p_last: Option<Decimal>,
    /// Contract page, ending in the contract symbol.
    #[serde(default, rename = "drillDownURL")]
    pub drill_down_url: Option<String>,
}

impl ChainRow {
    /// Expiry date when this row is a group header.
    ///
    /// Returns `Some(None)` for a header whose date does not parse, so the
    /// caller can stop attributing rows to the previous group.
    #[must_use]
    pub fn group_header(&self) -> Option<Option<NaiveDate>> {
        let group = self.expirygroup.as_deref().map(str::trim)?;
        if group.is_empty() {
            return None;
        }
        Some(parse_expiry_group(group))
    }

    /// Contract symbol from the last path segment of `drillDownURL`.
    #[must_use]
    pub fn contract_symbol(&self) -> Option<String> {
        let url = self.drill_down_url.as_deref()?.trim().trim_end_matches('/');
        let symbol = url.rsplit('/').next()?;
        (!symbol.is_empty()).then(|| symbol.to_string())
    }
}

/// Parse an expiry group header such as `"February 13, 2026"`.
#[must_use]
pub fn parse_expiry_group(group: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(group.trim(), "%B %d, %Y").ok()
}

// ============================================================================
// Greeks
// ============================================================================

/// `data` of `/api/quote/{ticker}/option-chain/greeks`.
#[derive(Debug, Clone, Deserialize)]
pub struct GreeksData {
    /// Greeks table.
    #[serde(default)]
    pub table: Option<GreeksTable>,
}

/// Table of greeks rows.
#[derive(Debug, Clone, Deserialize)]
pub struct GreeksTable {
    /// One row per strike.
    #[serde(default)]
    pub rows: Option<Vec<GreeksRow>>,
}

/// Greeks for one strike.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GreeksRow {
    /// Strike price.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub strike: Option<Decimal>,
    /// Call delta.
    #[serde(default, rename = "cDelta", deserialize_with = "lenient_decimal")]
    pub c_delta: Option<Decimal>,
    /// Put delta.
    #[serde(default, rename = "pDelta", deserialize_with = "lenient_decimal")]
    pub p_delta: Option<Decimal>,
}

// ============================================================================
// Quote Info
// ============================================================================

/// `data` of `/api/quote/{ticker}/info`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoData {
    /// Regular session quote.
    #[serde(default)]
    pub primary_data: Option<PrimaryData>,
}

/// Regular session quote fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryData {
    /// Last sale, e.g. `"$82.20"`.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub last_sale_price: Option<Decimal>,
    /// Older payloads carry the price here instead.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub last_trade: Option<Decimal>,
}

// ============================================================================
// Lenient numbers
// ============================================================================

/// Deserialize a number or numeric display string into `Option<Decimal>`.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(decimal_from_value))
}

/// Interpret a JSON value as a decimal, if it holds one.
#[must_use]
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal_str(&n.to_string()),
        Value::String(s) => parse_decimal_str(s),
        _ => None,
    }
}

/// Parse `"$1,234.50"`, `"82.2"` or `"1e-3"`; placeholders yield `None`.
#[must_use]
pub fn parse_decimal_str(raw: &str) -> Option<Decimal> {
    let cleaned = raw.trim().replace(['$', ','], "");
    let cleaned = cleaned.trim();
    if matches!(cleaned, "" | "--" | "N/A") {
        return None;
    }
    Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .ok()
}

/// Extract the price from `"LAST TRADE: $1,082.2 (AS OF FEB 6, 2026)"`.
#[must_use]
#[allow(clippy::expect_used)] // Regex is compile-time constant
pub fn parse_last_trade(text: &str) -> Option<Decimal> {
    static PRICE: OnceLock<Regex> = OnceLock::new();
    let re = PRICE.get_or_init(|| {
        Regex::new(r"\$\s*(\d[\d,]*(?:\.\d+)?)").expect("last trade regex is valid")
    });
    let captures = re.captures(text)?;
    parse_decimal_str(captures.get(1)?.as_str())
}
