//! Application Ports (Driven)
//!
//! Interfaces the application uses to reach upstream data providers.

mod option_chain_port;
mod price_history_port;

pub use option_chain_port::{
    ContractPremium, LatestPrice, MarketDataError, OptionChainPort, Sourced, mid_or_last,
};
pub use price_history_port::{ClosePrice, PriceHistoryPort};
