//! Options Domain Services

mod covered_call;
mod strike_interpolator;

pub use covered_call::{CONTRACT_MULTIPLIER, CoveredCall, CoveredCallOutcome};
pub use strike_interpolator::{DEFAULT_DELTA_TOLERANCE, StrikeInterpolator};
