//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer:
//!
//! - **Driven Adapters (Outbound)**
//!   - `upstream/`: Shared reqwest client, status and JSON error mapping
//!   - `nasdaq/`: Option chain, greeks and quote summary
//!   - `yahoo/`: Daily closes from the chart endpoint
//!
//! - **Driver Adapters (Inbound)**
//!   - `http/`: REST API controllers

pub mod http;
pub mod nasdaq;
pub mod upstream;
pub mod yahoo;
