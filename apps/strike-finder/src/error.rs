//! Application errors shared by the CLI and HTTP API.
//!
//! Every failure surfaced to a caller is one of two kinds:
//!
//! | Code | HTTP | Usage |
//! |------|------|-------|
//! | `INVALID_INPUT` | 400 | Bad parameters, empty quote set, contract or date not listed |
//! | `UPSTREAM_ERROR` | 502 | Provider returned non-2xx, unreadable JSON, or was unreachable |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::MarketDataError;
use crate::domain::shared::DomainError;

/// Error codes returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Invalid or missing parameters.
    InvalidInput,
    /// A data provider failed.
    UpstreamError,
}

impl ErrorCode {
    /// HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::UpstreamError => 502,
        }
    }

    /// Stable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::UpstreamError => "UPSTREAM_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// An error with a code and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct AppError {
    code: ErrorCode,
    message: String,
}

impl AppError {
    /// Create a new error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Invalid caller input.
    #[must_use]
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Data provider failure.
    #[must_use]
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamError, message)
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this is an input error.
    #[must_use]
    pub fn is_input(&self) -> bool {
        self.code == ErrorCode::InvalidInput
    }

    /// JSON body for HTTP responses.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        HttpErrorResponse {
            code: self.code.reason().to_string(),
            message: self.message.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.reason(), self.message)
    }
}

impl From<MarketDataError> for AppError {
    fn from(err: MarketDataError) -> Self {
        if err.is_not_found() {
            Self::input(err.to_string())
        } else {
            Self::upstream(err.to_string())
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        Self::input(err.to_string())
    }
}

/// HTTP error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}
