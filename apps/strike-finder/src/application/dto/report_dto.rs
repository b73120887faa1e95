//! Report DTOs
//!
//! Values returned by the options desk service and rendered by the CLI and
//! HTTP API. Decimals serialize as strings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::ports::{ClosePrice, ContractPremium, LatestPrice};
use crate::domain::options::{CoveredCallOutcome, InterpolationMethod, OptionRight};

/// Either a historical close or the latest trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceReport {
    /// Close on a requested date.
    Close(ClosePrice),
    /// Most recent trade.
    Latest(LatestPrice),
}

impl PriceReport {
    /// The price, whichever kind.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        match self {
            Self::Close(close) => close.close,
            Self::Latest(latest) => latest.price,
        }
    }

    /// Upstream URLs.
    #[must_use]
    pub fn sources(&self) -> &[String] {
        match self {
            Self::Close(close) => &close.sources,
            Self::Latest(latest) => &latest.sources,
        }
    }
}

/// Strike selected for a target delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaStrikeReport {
    /// Ticker symbol (upper case).
    pub ticker: String,
    /// Expiration date.
    pub expiry: NaiveDate,
    /// Call or put.
    pub right: OptionRight,
    /// Requested delta.
    pub target_delta: Decimal,
    /// Selected or interpolated strike.
    pub strike: Decimal,
    /// Delta at the returned strike.
    pub achieved_delta: Decimal,
    /// Mid premium at the returned strike.
    pub premium: Decimal,
    /// How the strike was derived: `exact`, `interpolated`, or `clamped`
    /// when the target lies outside the listed deltas and the boundary
    /// quote is returned.
    pub method: InterpolationMethod,
    /// Quotes with usable delta and prices.
    pub quotes_considered: usize,
    /// Upstream URLs.
    pub sources: Vec<String>,
}

/// How the covered call strike was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrikeSelection {
    /// Strike given by the caller.
    Given,
    /// Strike derived from the target delta.
    Delta(InterpolationMethod),
}

/// Covered call analysis for one expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoveredCallReport {
    /// Ticker symbol (upper case).
    pub ticker: String,
    /// Analysis date.
    pub asof: NaiveDate,
    /// Expiration date.
    pub expiry: NaiveDate,
    /// Calendar days from `asof` to `expiry`.
    pub days_to_expiry: i64,
    /// Underlying price per share.
    pub spot: Decimal,
    /// Always call.
    pub right: OptionRight,
    /// Shares covered.
    pub shares: u32,
    /// Strike of the short call.
    pub strike: Decimal,
    /// How the strike was chosen.
    pub strike_selection: StrikeSelection,
    /// Requested call delta.
    pub target_delta: Decimal,
    /// Reported or interpolated delta at the strike.
    pub delta: Option<Decimal>,
    /// Premium per share.
    pub premium: Decimal,
    /// Best bid, for a given strike.
    pub premium_bid: Option<Decimal>,
    /// Best ask, for a given strike.
    pub premium_ask: Option<Decimal>,
    /// Breakeven, profit and return figures.
    #[serde(flatten)]
    pub outcome: CoveredCallOutcome,
    /// Upstream URLs.
    pub sources: Vec<String>,
}

/// Where the case report's underlying price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnderlyingPriceKind {
    /// Daily close on the requested date.
    Close,
    /// Last sale, used when the close was unavailable.
    LastSale,
}

/// Underlying close plus one put quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Ticker symbol (upper case).
    pub ticker: String,
    /// Requested close date.
    pub date: NaiveDate,
    /// Underlying price.
    pub underlying_price: Decimal,
    /// Where the underlying price came from.
    pub underlying_kind: UnderlyingPriceKind,
    /// Why the close was not used, if it was not.
    pub underlying_warning: Option<String>,
    /// Put quote at the requested strike and expiry.
    pub put: ContractPremium,
    /// Upstream URLs.
    pub sources: Vec<String>,
}
