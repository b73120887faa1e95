//! Domain Layer
//!
//! Business logic with zero infrastructure dependencies.
//!
//! # Bounded Contexts
//!
//! - [`options`]: Option quotes, delta-to-strike interpolation, covered call math
//! - [`shared`]: Errors and the ticker value object

pub mod options;
pub mod shared;
