//! Option Chain Port (Driven Port)
//!
//! Interface for fetching spot prices and option chains from an upstream
//! provider. Every successful response carries the upstream URLs it was
//! built from.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::options::{OptionQuote, OptionRight};

/// A value together with the upstream URLs used to produce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sourced<T> {
    /// The fetched value.
    pub value: T,
    /// Final request URLs, query string included.
    pub sources: Vec<String>,
}

impl<T> Sourced<T> {
    /// Wrap a value fetched from a single URL.
    pub fn single(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            sources: vec![source.into()],
        }
    }

    /// Wrap a value fetched from several URLs.
    pub const fn new(value: T, sources: Vec<String>) -> Self {
        Self { value, sources }
    }
}

/// Most recent traded price of an underlying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestPrice {
    /// Ticker symbol (upper case).
    pub ticker: String,
    /// Last price.
    pub price: Decimal,
    /// Upstream URLs.
    pub sources: Vec<String>,
}

/// Quote for one listed option contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractPremium {
    /// Ticker symbol (upper case).
    pub ticker: String,
    /// Expiration date.
    pub expiry: NaiveDate,
    /// Strike price.
    pub strike: Decimal,
    /// Call or put.
    pub right: OptionRight,
    /// Best bid.
    pub bid: Option<Decimal>,
    /// Best ask.
    pub ask: Option<Decimal>,
    /// Last trade.
    pub last: Option<Decimal>,
    /// Mid of bid and ask, else the last trade.
    pub mid: Option<Decimal>,
    /// Reported delta, when the greeks lookup succeeded.
    pub delta: Option<Decimal>,
    /// Exchange contract symbol.
    pub contract_symbol: Option<String>,
    /// Upstream URLs.
    pub sources: Vec<String>,
}

impl ContractPremium {
    /// Premium to use when writing the contract: mid, else bid.
    #[must_use]
    pub fn premium(&self) -> Option<Decimal> {
        self.mid.or(self.bid)
    }
}

/// Mid of bid and ask when both sides exist, otherwise the last trade.
#[must_use]
pub fn mid_or_last(
    bid: Option<Decimal>,
    ask: Option<Decimal>,
    last: Option<Decimal>,
) -> Option<Decimal> {
    match (bid, ask) {
        (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
        _ => last,
    }
}

/// Market data error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MarketDataError {
    /// Upstream answered with a non-success status.
    #[error("HTTP {status} from {url}: {snippet}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Request URL.
        url: String,
        /// Start of the response body.
        snippet: String,
    },

    /// Transport failure (DNS, connect, timeout).
    #[error("request to {url} failed: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Error details.
        message: String,
    },

    /// Response body was not valid JSON for the expected shape.
    #[error("invalid JSON from {url}: {message}; body starts: {snippet}")]
    InvalidJson {
        /// Request URL.
        url: String,
        /// Parser error.
        message: String,
        /// Start of the response body.
        snippet: String,
    },

    /// JSON parsed but lacked the fields we need.
    #[error("unexpected payload from {url}: {message}")]
    UnexpectedPayload {
        /// Request URL.
        url: String,
        /// Error details.
        message: String,
    },

    /// The requested contract or date is not listed upstream.
    #[error("{message}")]
    NotFound {
        /// What was missing and what is available.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl MarketDataError {
    /// Whether the caller asked for something the provider does not list.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Port for option chain data.
#[async_trait]
pub trait OptionChainPort: Send + Sync {
    /// Latest underlying price as shown alongside the option chain.
    async fn latest_price(&self, ticker: &str) -> Result<LatestPrice, MarketDataError>;

    /// Last sale price from the quote summary.
    async fn last_sale_price(&self, ticker: &str) -> Result<LatestPrice, MarketDataError>;

    /// Listed expiration dates, sorted and de-duplicated.
    async fn expiries(&self, ticker: &str) -> Result<Sourced<Vec<NaiveDate>>, MarketDataError>;

    /// Quotes with delta for one expiry and right, sorted by strike.
    ///
    /// Rows lacking delta, bid or ask, or with a zero mid, are dropped, so the
    /// result may be empty.
    async fn option_chain(
        &self,
        ticker: &str,
        expiry: NaiveDate,
        right: OptionRight,
    ) -> Result<Sourced<Vec<OptionQuote>>, MarketDataError>;

    /// Quote for a single listed contract.
    async fn contract_premium(
        &self,
        ticker: &str,
        expiry: NaiveDate,
        strike: Decimal,
        right: OptionRight,
    ) -> Result<ContractPremium, MarketDataError>;
}
