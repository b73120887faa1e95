//! HTTP/REST API adapter.
//!
//! Inbound adapter exposing the options desk as JSON GET endpoints.

mod controller;
mod request;
mod response;

pub use controller::{AppState, REQUEST_ID_HEADER, create_router};
pub use request::*;
pub use response::*;
