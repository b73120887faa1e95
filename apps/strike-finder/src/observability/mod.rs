//! Observability module for metrics.
//!
//! Logging is plain `tracing`; the subscriber is installed by the binary.

mod metrics;

pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_api_request, record_interpolation,
    record_upstream_request,
};
