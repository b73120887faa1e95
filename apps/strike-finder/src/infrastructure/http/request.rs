//! HTTP query parameters.
//!
//! Optional fields fall back to the same defaults as the CLI. `right` is
//! taken as text so that `PUT` and `Call` are accepted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::services::{DEFAULT_CALL_DELTA, DEFAULT_PUT_DELTA, DEFAULT_SHARES};
use crate::domain::options::OptionRight;
use crate::error::AppError;

/// `GET /price`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuery {
    /// Underlying ticker.
    pub ticker: String,
    /// Trading date for a historical close; latest price when absent.
    pub date: Option<NaiveDate>,
}

/// `GET /delta-strike`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeltaStrikeQuery {
    /// Underlying ticker.
    pub ticker: String,
    /// Expiration date.
    pub expiry: NaiveDate,
    /// `put` (default) or `call`.
    pub right: Option<String>,
    /// Target delta.
    #[serde(default = "default_put_delta")]
    pub target_delta: Decimal,
}

/// `GET /strike-premium`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrikePremiumQuery {
    /// Underlying ticker.
    pub ticker: String,
    /// Target delta.
    pub target_delta: Decimal,
    /// `put` (default) or `call`.
    pub right: Option<String>,
    /// Expiration date; nearest listed expiry when absent.
    pub expiry: Option<NaiveDate>,
    /// Reference date for picking the nearest expiry.
    pub asof: Option<NaiveDate>,
}

/// `GET /put-premium`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutPremiumQuery {
    /// Underlying ticker.
    pub ticker: String,
    /// Expiration date.
    pub expiry: NaiveDate,
    /// Listed strike.
    pub strike: Decimal,
}

/// `GET /option-premium`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionPremiumQuery {
    /// Underlying ticker.
    pub ticker: String,
    /// Expiration date.
    pub expiry: NaiveDate,
    /// Listed strike.
    pub strike: Decimal,
    /// `put` (default) or `call`.
    pub right: Option<String>,
}

/// `GET /covered-call`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoveredCallQuery {
    /// Underlying ticker.
    pub ticker: String,
    /// Expiration date.
    pub expiry: NaiveDate,
    /// Analysis date; today when absent.
    pub asof: Option<NaiveDate>,
    /// Spot override.
    pub spot: Option<Decimal>,
    /// Strike override.
    pub strike: Option<Decimal>,
    /// Target call delta when no strike is given.
    #[serde(default = "default_call_delta")]
    pub target_delta: Decimal,
    /// Shares covered, a multiple of 100.
    #[serde(default = "default_shares")]
    pub shares: u32,
}

const fn default_put_delta() -> Decimal {
    DEFAULT_PUT_DELTA
}

const fn default_call_delta() -> Decimal {
    DEFAULT_CALL_DELTA
}

const fn default_shares() -> u32 {
    DEFAULT_SHARES
}

/// Parse an optional `right` parameter, defaulting to put.
///
/// # Errors
///
/// Returns an input error for anything other than put or call.
pub fn parse_right(right: Option<&str>) -> Result<OptionRight, AppError> {
    right.map_or(Ok(OptionRight::Put), |r| r.parse().map_err(AppError::from))
}
