//! Nasdaq Quote API Adapter
//!
//! Option chains, option greeks and quote info from `api.nasdaq.com`:
//! - Chain rows grouped under expiry headers, joined with greeks by strike
//! - Lenient numeric parsing for display-formatted values
//! - Single-contract premium lookup with best-effort delta

mod adapter;
mod api_types;

pub use adapter::{DEFAULT_BASE_URL, NasdaqAdapter, PROVIDER};
pub use api_types::{parse_decimal_str, parse_last_trade};
