//! Shared Domain Types
//!
//! Errors and value objects shared across the options domain.

pub mod errors;
pub mod ticker;

pub use errors::DomainError;
pub use ticker::Ticker;
