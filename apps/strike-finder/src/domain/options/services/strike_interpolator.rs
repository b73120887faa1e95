//! Strike Interpolator
//!
//! Maps a target delta onto the discrete (strike, delta) grid of one expiry.
//!
//! # Rules
//!
//! 1. A quote whose delta is within `tolerance` of the target is returned as
//!    is ([`InterpolationMethod::Exact`]). The closest such quote wins, ties go
//!    to the lower strike.
//! 2. Otherwise the two quotes adjacent in delta order that bracket the target
//!    are blended linearly in delta space
//!    ([`InterpolationMethod::Interpolated`]):
//!
//!    ```text
//!    w       = (target - d_lo) / (d_hi - d_lo)
//!    strike  = k_lo + w * (k_hi - k_lo)
//!    premium = m_lo + w * (m_hi - m_lo)
//!    ```
//!
//! 3. A target outside the observed delta range returns the boundary quote
//!    with the nearest delta ([`InterpolationMethod::Clamped`]). No
//!    extrapolation.
//!
//! Quotes arrive ordered by strike, but nothing here relies on that: the grid
//! is re-sorted by delta, so non-monotone chains still bracket correctly.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::options::value_objects::{InterpolationMethod, InterpolationResult, OptionQuote};
use crate::domain::shared::DomainError;

/// Default tolerance for treating a reported delta as an exact match.
pub const DEFAULT_DELTA_TOLERANCE: Decimal = dec!(0.0001);

/// Decimal places kept on interpolated strikes and premiums.
const RESULT_SCALE: u32 = 4;

/// Selects or interpolates the strike for a target delta.
#[derive(Debug, Clone, Copy)]
pub struct StrikeInterpolator {
    tolerance: Decimal,
}

impl Default for StrikeInterpolator {
    fn default() -> Self {
        Self::new(DEFAULT_DELTA_TOLERANCE)
    }
}

impl StrikeInterpolator {
    /// Create an interpolator with the given exact-match tolerance.
    #[must_use]
    pub fn new(tolerance: Decimal) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    /// Exact-match tolerance in delta units.
    #[must_use]
    pub const fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Find the strike and premium for `target_delta`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyQuoteSet`] when `quotes` is empty.
    pub fn interpolate(
        &self,
        quotes: &[OptionQuote],
        target_delta: Decimal,
    ) -> Result<InterpolationResult, DomainError> {
        if quotes.is_empty() {
            return Err(DomainError::EmptyQuoteSet);
        }

        if let Some(quote) = self.exact_match(quotes, target_delta) {
            return Ok(from_quote(quote, InterpolationMethod::Exact));
        }

        let mut by_delta: Vec<&OptionQuote> = quotes.iter().collect();
        by_delta.sort_by(|a, b| a.delta.cmp(&b.delta).then(a.strike.cmp(&b.strike)));

        let (Some(lowest), Some(highest)) = (by_delta.first(), by_delta.last()) else {
            return Err(DomainError::EmptyQuoteSet);
        };

        if target_delta < lowest.delta {
            return Ok(from_quote(lowest, InterpolationMethod::Clamped));
        }
        if target_delta > highest.delta {
            return Ok(from_quote(highest, InterpolationMethod::Clamped));
        }

        for pair in by_delta.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if lo.delta < target_delta && target_delta < hi.delta {
                return Ok(blend(lo, hi, target_delta));
            }
        }

        // Only reachable with a zero tolerance when the target sits on a grid
        // delta, which is an exact match.
        let nearest = nearest_by_delta(quotes, target_delta).unwrap_or(lowest);
        Ok(from_quote(nearest, InterpolationMethod::Exact))
    }

    fn exact_match<'a>(
        &self,
        quotes: &'a [OptionQuote],
        target_delta: Decimal,
    ) -> Option<&'a OptionQuote> {
        nearest_by_delta(quotes, target_delta)
            .filter(|q| (q.delta - target_delta).abs() <= self.tolerance)
    }
}

fn nearest_by_delta(quotes: &[OptionQuote], target_delta: Decimal) -> Option<&OptionQuote> {
    quotes.iter().min_by(|a, b| {
        (a.delta - target_delta)
            .abs()
            .cmp(&(b.delta - target_delta).abs())
            .then(a.strike.cmp(&b.strike))
    })
}

fn from_quote(quote: &OptionQuote, method: InterpolationMethod) -> InterpolationResult {
    InterpolationResult {
        strike: quote.strike,
        achieved_delta: quote.delta,
        premium: quote.mid(),
        method,
    }
}

fn blend(lo: &OptionQuote, hi: &OptionQuote, target_delta: Decimal) -> InterpolationResult {
    let weight = (target_delta - lo.delta) / (hi.delta - lo.delta);
    let strike = lo.strike + weight * (hi.strike - lo.strike);
    let premium = lo.mid() + weight * (hi.mid() - lo.mid());

    InterpolationResult {
        strike: strike.round_dp(RESULT_SCALE),
        achieved_delta: target_delta,
        premium: premium.round_dp(RESULT_SCALE),
        method: InterpolationMethod::Interpolated,
    }
}
