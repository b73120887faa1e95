//! Options Bounded Context
//!
//! Quotes for a single expiry, the delta-to-strike interpolator and the
//! covered call payoff calculator.

pub mod services;
pub mod value_objects;

pub use services::{
    CONTRACT_MULTIPLIER, CoveredCall, CoveredCallOutcome, DEFAULT_DELTA_TOLERANCE, StrikeInterpolator,
};
pub use value_objects::{InterpolationMethod, InterpolationResult, OptionQuote, OptionRight};
