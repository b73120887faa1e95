//! Interpolation Result Value Object

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a strike was derived from the quote grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    /// A listed quote matched the target delta within tolerance.
    Exact,
    /// Linear blend of the two quotes bracketing the target delta.
    Interpolated,
    /// Target outside the observed delta range; nearest boundary quote returned.
    Clamped,
}

impl InterpolationMethod {
    /// Lowercase label for logs, metrics and text output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Interpolated => "interpolated",
            Self::Clamped => "clamped",
        }
    }
}

impl std::fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strike and premium selected for a target delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpolationResult {
    /// Selected or interpolated strike.
    pub strike: Decimal,
    /// Delta at the returned strike.
    pub achieved_delta: Decimal,
    /// Mid premium at the returned strike.
    pub premium: Decimal,
    /// How the strike was derived.
    pub method: InterpolationMethod,
}
