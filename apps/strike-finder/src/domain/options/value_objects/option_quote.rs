//! Option Quote Value Object

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of an options chain for a single expiry and right.
///
/// Delta is signed as reported upstream: puts are negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Strike price.
    pub strike: Decimal,
    /// Reported delta.
    pub delta: Decimal,
    /// Best bid.
    pub bid: Decimal,
    /// Best ask.
    pub ask: Decimal,
}

impl OptionQuote {
    /// Create a new quote.
    #[must_use]
    pub const fn new(strike: Decimal, delta: Decimal, bid: Decimal, ask: Decimal) -> Self {
        Self {
            strike,
            delta,
            bid,
            ask,
        }
    }

    /// Get the mid price, used as the premium.
    #[must_use]
    pub fn mid(&self) -> Decimal {
        (self.bid + self.ask) / Decimal::TWO
    }
}
