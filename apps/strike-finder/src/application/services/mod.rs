//! Application Services

mod options_desk;

pub use options_desk::{
    CoveredCallRequest, DEFAULT_CALL_DELTA, DEFAULT_PUT_DELTA, DEFAULT_SHARES, OptionsDeskService,
    local_today,
};
