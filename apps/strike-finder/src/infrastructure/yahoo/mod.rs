//! Yahoo Finance Chart Adapter
//!
//! Daily closes from the unofficial `/v8/finance/chart` endpoint.

mod adapter;
mod api_types;

pub use adapter::{DEFAULT_BASE_URL, DailyClose, PROVIDER, YahooChartAdapter};
