//! Price History Port (Driven Port)
//!
//! Interface for daily closing prices.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MarketDataError;

/// Closing price for one trading day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosePrice {
    /// Ticker symbol (upper case).
    pub ticker: String,
    /// Exchange-local trading date.
    pub trading_date: NaiveDate,
    /// Closing price.
    pub close: Decimal,
    /// Quote currency.
    pub currency: Option<String>,
    /// Listing exchange.
    pub exchange: Option<String>,
    /// Upstream URLs.
    pub sources: Vec<String>,
}

/// Port for historical daily prices.
#[async_trait]
pub trait PriceHistoryPort: Send + Sync {
    /// Close on `date`.
    ///
    /// Returns [`MarketDataError::NotFound`] when the provider has no bar for
    /// that date (weekend, holiday, or outside listing history).
    async fn close_on(&self, ticker: &str, date: NaiveDate) -> Result<ClosePrice, MarketDataError>;
}
