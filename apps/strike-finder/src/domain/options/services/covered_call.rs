//! Covered call economics.
//!
//! Long shares plus one short call per 100 shares, held to expiry.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::shared::DomainError;

/// Shares covered by one listed equity option contract.
pub const CONTRACT_MULTIPLIER: u32 = 100;

const DAYS_PER_YEAR: Decimal = dec!(365);
const RETURN_SCALE: u32 = 6;

/// Inputs for a covered call position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoveredCall {
    /// Underlying price paid per share.
    pub spot: Decimal,
    /// Strike of the short call.
    pub strike: Decimal,
    /// Premium received per share.
    pub premium: Decimal,
    /// Shares held.
    pub shares: u32,
    /// Calendar days until expiry.
    pub days_to_expiry: i64,
}

/// Outcome of a covered call held to expiry.
///
/// Returns are fractions of spot (0.05 is 5%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoveredCallOutcome {
    /// Spot less premium.
    pub breakeven: Decimal,
    /// Premium received across all shares.
    pub premium_total: Decimal,
    /// Profit per share if called away at the strike.
    pub max_profit_per_share: Decimal,
    /// Profit across all shares if called away.
    pub max_profit_total: Decimal,
    /// Net cash outlay after premium.
    pub cost_basis_total: Decimal,
    /// Max profit per share over spot.
    pub max_return: Decimal,
    /// Max return scaled to a 365-day year. `None` for same-day expiry.
    pub annualized_max_return: Option<Decimal>,
}

impl CoveredCall {
    /// Check the position is well formed.
    ///
    /// # Errors
    ///
    /// Returns an error if shares are not a positive round lot, spot is not
    /// positive, or the premium is negative.
    pub fn validate(&self) -> Result<(), DomainError> {
        Self::validate_shares(self.shares)?;
        if self.spot <= Decimal::ZERO {
            return Err(DomainError::InvalidValue {
                field: "spot".to_string(),
                message: format!("must be positive, got {}", self.spot),
            });
        }
        if self.premium < Decimal::ZERO {
            return Err(DomainError::InvalidValue {
                field: "premium".to_string(),
                message: format!("must not be negative, got {}", self.premium),
            });
        }
        Ok(())
    }

    /// Check a share count is a positive multiple of [`CONTRACT_MULTIPLIER`].
    ///
    /// # Errors
    ///
    /// Returns an error for zero shares or an odd lot.
    pub fn validate_shares(shares: u32) -> Result<(), DomainError> {
        if shares == 0 {
            return Err(DomainError::InvalidValue {
                field: "shares".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if shares % CONTRACT_MULTIPLIER != 0 {
            return Err(DomainError::BusinessRuleViolation {
                rule: "ROUND_LOT".to_string(),
                message: format!(
                    "shares must be a multiple of {CONTRACT_MULTIPLIER} (1 option contract = {CONTRACT_MULTIPLIER} shares), got {shares}"
                ),
            });
        }
        Ok(())
    }

    /// Compute breakeven, profit and return figures.
    ///
    /// # Errors
    ///
    /// Returns an error if the position fails [`CoveredCall::validate`].
    pub fn outcome(&self) -> Result<CoveredCallOutcome, DomainError> {
        self.validate()?;

        let shares = Decimal::from(self.shares);
        let max_profit_per_share = (self.strike - self.spot) + self.premium;
        let max_return = max_profit_per_share / self.spot;

        let annualized_max_return = (self.days_to_expiry > 0).then(|| {
            let years = Decimal::from(self.days_to_expiry) / DAYS_PER_YEAR;
            (max_return / years).round_dp(RETURN_SCALE)
        });

        Ok(CoveredCallOutcome {
            breakeven: self.spot - self.premium,
            premium_total: self.premium * shares,
            max_profit_per_share,
            max_profit_total: max_profit_per_share * shares,
            cost_basis_total: (self.spot - self.premium) * shares,
            max_return: max_return.round_dp(RETURN_SCALE),
            annualized_max_return,
        })
    }
}
