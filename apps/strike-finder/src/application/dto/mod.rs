//! Data Transfer Objects (DTOs)
//!
//! Reports returned by the application service to the CLI and HTTP API.

mod report_dto;

pub use report_dto::{
    CaseReport, CoveredCallReport, DeltaStrikeReport, PriceReport, StrikeSelection,
    UnderlyingPriceKind,
};
