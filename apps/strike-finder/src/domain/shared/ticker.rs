//! Ticker value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::shared::DomainError;

const MAX_LEN: usize = 15;

/// An equity or index ticker, normalized to upper case.
///
/// Examples: "NFLX", "BRK.B", "^SPX".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Parse and normalize a ticker.
    ///
    /// # Errors
    ///
    /// Returns error if the ticker is empty, too long, or contains characters
    /// other than letters, digits, `.`, `-`, `^` and `=`.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidValue {
                field: "ticker".to_string(),
                message: "Ticker cannot be empty".to_string(),
            });
        }
        if trimmed.len() > MAX_LEN {
            return Err(DomainError::InvalidValue {
                field: "ticker".to_string(),
                message: format!("Ticker exceeds {MAX_LEN} characters"),
            });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
        {
            return Err(DomainError::InvalidValue {
                field: "ticker".to_string(),
                message: format!("Ticker '{trimmed}' contains invalid characters"),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Get the ticker string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
