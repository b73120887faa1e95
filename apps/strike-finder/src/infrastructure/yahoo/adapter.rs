//! Yahoo chart adapter implementing `PriceHistoryPort`.

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::application::ports::{ClosePrice, MarketDataError, PriceHistoryPort};
use crate::infrastructure::upstream::UpstreamHttpClient;

use super::api_types::{ChartResponse, ChartResult};

/// Provider label for logs and metrics.
pub const PROVIDER: &str = "yahoo";

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Days fetched before the requested date.
const WINDOW_BEFORE_DAYS: u64 = 2;
/// Days fetched after the requested date.
const WINDOW_AFTER_DAYS: u64 = 3;

const CLOSE_SCALE: u32 = 4;

/// Yahoo Finance daily chart adapter.
#[derive(Debug, Clone)]
pub struct YahooChartAdapter {
    client: UpstreamHttpClient,
    base_url: String,
}

/// One daily bar: exchange-local date and close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyClose {
    /// Exchange-local trading date.
    pub date: NaiveDate,
    /// Close, rounded to 4 places.
    pub close: Decimal,
}

impl YahooChartAdapter {
    /// Create a new adapter.
    pub fn new(client: UpstreamHttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PriceHistoryPort for YahooChartAdapter {
    async fn close_on(&self, ticker: &str, date: NaiveDate) -> Result<ClosePrice, MarketDataError> {
        let (period1, period2) = window(date);
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker.to_ascii_uppercase());
        let query = [
            ("period1", period1.to_string()),
            ("period2", period2.to_string()),
            ("interval", "1d".to_string()),
            ("events", "history".to_string()),
            ("includeAdjustedClose", "true".to_string()),
        ];

        let fetched = self.client.get_json::<ChartResponse>(&url, &query).await?;
        let chart = fetched.body.chart;

        if let Some(error) = chart.error.filter(|e| !e.is_null()) {
            return Err(MarketDataError::UnexpectedPayload {
                url: fetched.url,
                message: format!("chart error for {ticker}: {}", describe_error(&error)),
            });
        }

        let Some(result) = chart.result.and_then(|r| r.into_iter().next()) else {
            return Err(MarketDataError::UnexpectedPayload {
                url: fetched.url,
                message: format!("no chart result for {ticker}"),
            });
        };

        let bars = daily_closes(&result);
        let Some(bar) = bars.iter().find(|b| b.date == date) else {
            let available = bars
                .iter()
                .map(|b| b.date.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(MarketDataError::NotFound {
                message: format!(
                    "no close for {} on {date} (not a trading day?); available: [{available}]",
                    ticker.to_ascii_uppercase()
                ),
            });
        };

        Ok(ClosePrice {
            ticker: ticker.to_ascii_uppercase(),
            trading_date: bar.date,
            close: bar.close,
            currency: result.meta.currency,
            exchange: result.meta.exchange_name,
            sources: vec![fetched.url],
        })
    }
}

/// Unix-second bounds: `date` 00:00 UTC minus 2 days to plus 3 days.
fn window(date: NaiveDate) -> (i64, i64) {
    let start = date
        .checked_sub_days(Days::new(WINDOW_BEFORE_DAYS))
        .unwrap_or(date);
    let end = date
        .checked_add_days(Days::new(WINDOW_AFTER_DAYS))
        .unwrap_or(date);
    (
        start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp(),
        end.and_time(chrono::NaiveTime::MIN).and_utc().timestamp(),
    )
}

/// Non-null closes keyed by exchange-local date.
fn daily_closes(result: &ChartResult) -> Vec<DailyClose> {
    let offset = result.meta.gmtoffset.unwrap_or(0);
    let timestamps = result.timestamp.as_deref().unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .first()
        .and_then(|q| q.close.as_deref())
        .unwrap_or_default();

    timestamps
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
            let close = Decimal::try_from((*close)?).ok()?.round_dp(CLOSE_SCALE);
            Some(DailyClose { date, close })
        })
        .collect()
}

fn describe_error(error: &Value) -> String {
    error
        .get("description")
        .and_then(Value::as_str)
        .map_or_else(|| error.to_string(), str::to_string)
}
