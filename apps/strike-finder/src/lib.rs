// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Strike Finder - Rust Core Library
//!
//! Looks up closes and option chains from public JSON endpoints and maps a
//! target delta onto a strike and premium.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure calculations
//!   - `options`: Quotes, the strike interpolator, covered call payoff
//!   - `shared`: Domain errors, ticker symbols
//!
//! - **Application**: Orchestration
//!   - `ports`: `OptionChainPort`, `PriceHistoryPort`
//!   - `services`: `OptionsDeskService`, one method per operation
//!   - `dto`: Reports returned to the CLI and API
//!
//! - **Infrastructure**: Adapters
//!   - `nasdaq`: Option chain, greeks, quote summary
//!   - `yahoo`: Daily closes
//!   - `upstream`: Shared HTTP client
//!   - `http`: axum JSON API
//!
//! - **Entry points**: `cli` (clap) and the `strike-finder` binary

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Command line parsing and text rendering.
pub mod cli;

/// YAML configuration.
pub mod config;

/// Errors surfaced to callers.
pub mod error;

/// Prometheus metrics.
pub mod observability;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::options::{
    CoveredCall, CoveredCallOutcome, InterpolationMethod, InterpolationResult, OptionQuote,
    OptionRight, StrikeInterpolator,
};
pub use domain::shared::{DomainError, Ticker};

// Application re-exports
pub use application::dto::{
    CaseReport, CoveredCallReport, DeltaStrikeReport, PriceReport, StrikeSelection,
    UnderlyingPriceKind,
};
pub use application::ports::{
    ClosePrice, ContractPremium, LatestPrice, MarketDataError, OptionChainPort, PriceHistoryPort,
    Sourced,
};
pub use application::services::{CoveredCallRequest, OptionsDeskService};

// Infrastructure re-exports
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::nasdaq::NasdaqAdapter;
pub use infrastructure::upstream::UpstreamHttpClient;
pub use infrastructure::yahoo::YahooChartAdapter;

pub use config::{Config, ConfigError, load_config};
pub use error::{AppError, ErrorCode};
