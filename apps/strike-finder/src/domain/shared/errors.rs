//! Domain errors.

use std::fmt;

/// Domain-level errors that can occur in business logic.
///
/// Every variant describes a problem with caller-supplied input or with the
/// data the caller asked about, never an infrastructure failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid value for a field.
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Business rule violation.
    BusinessRuleViolation {
        /// Rule name or code.
        rule: String,
        /// Description of the violation.
        message: String,
    },

    /// No quotes were supplied to a calculation that needs at least one.
    EmptyQuoteSet,
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
            Self::BusinessRuleViolation { rule, message } => {
                write!(f, "Business rule '{rule}' violated: {message}")
            }
            Self::EmptyQuoteSet => write!(f, "Quote set is empty"),
        }
    }
}

impl std::error::Error for DomainError {}
