//! Options Value Objects

mod interpolation_result;
mod option_quote;
mod option_right;

pub use interpolation_result::{InterpolationMethod, InterpolationResult};
pub use option_quote::OptionQuote;
pub use option_right::OptionRight;
