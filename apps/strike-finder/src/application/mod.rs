//! Application Layer
//!
//! The application layer orchestrates domain logic and upstream data.
//! It defines:
//!
//! - **Ports**: Interfaces for the upstream data providers
//! - **Services**: The options desk, one method per user-facing operation
//! - **DTOs**: Reports returned to the CLI and HTTP API

pub mod dto;
pub mod ports;
pub mod services;

pub use dto::*;
pub use ports::*;
pub use services::*;
