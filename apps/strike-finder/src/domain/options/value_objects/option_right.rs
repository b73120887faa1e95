//! Option Right Value Object

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::shared::DomainError;

/// Option right (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionRight {
    /// Call option (right to buy).
    Call,
    /// Put option (right to sell).
    #[default]
    Put,
}

impl OptionRight {
    /// Lowercase name as used on the command line and in query strings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Put => "put",
        }
    }
}

impl std::fmt::Display for OptionRight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionRight {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "put" => Ok(Self::Put),
            "call" => Ok(Self::Call),
            other => Err(DomainError::InvalidValue {
                field: "right".to_string(),
                message: format!("must be 'put' or 'call', got '{other}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(" PUT ".parse::<OptionRight>().unwrap(), OptionRight::Put);
        assert_eq!("Call".parse::<OptionRight>().unwrap(), OptionRight::Call);
    }

    #[test]
    fn rejects_unknown_right() {
        let err = "straddle".parse::<OptionRight>().unwrap_err();
        assert!(err.to_string().contains("straddle"));
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&OptionRight::Call).unwrap();
        assert_eq!(json, r#""call""#);
        let parsed: OptionRight = serde_json::from_str(r#""put""#).unwrap();
        assert_eq!(parsed, OptionRight::Put);
    }

    #[test]
    fn defaults_to_put() {
        assert_eq!(OptionRight::default(), OptionRight::Put);
    }
}
