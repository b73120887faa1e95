//! Strike interpolation settings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::options::{DEFAULT_DELTA_TOLERANCE, StrikeInterpolator};

/// Interpolation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpolationConfig {
    /// A quote within this distance of the target delta is an exact match.
    #[serde(default = "default_delta_tolerance")]
    pub delta_tolerance: Decimal,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            delta_tolerance: default_delta_tolerance(),
        }
    }
}

impl InterpolationConfig {
    /// Build the interpolator.
    #[must_use]
    pub fn interpolator(&self) -> StrikeInterpolator {
        StrikeInterpolator::new(self.delta_tolerance)
    }
}

const fn default_delta_tolerance() -> Decimal {
    DEFAULT_DELTA_TOLERANCE
}
