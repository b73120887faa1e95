//! Prometheus metrics for upstream fetches, API requests and interpolation.
//!
//! Recording is a no-op until a recorder is installed, so the CLI pays
//! nothing for these calls. `serve` installs the exporter when
//! `observability.metrics.enabled` is set.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for upstream latency (in seconds).
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 9090)),
            // Upstream JSON endpoints answer in tens of ms to several seconds
            latency_buckets: vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0],
        }
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            ..Default::default()
        }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

// ============================================================================
// Upstream Metrics
// ============================================================================

/// Record one upstream HTTP request.
///
/// # Arguments
///
/// * `provider` - Data provider (e.g., "nasdaq", "yahoo")
/// * `outcome` - "ok", "http_error", "network_error" or "invalid_json"
/// * `latency_seconds` - Request round trip in seconds
pub fn record_upstream_request(provider: &str, outcome: &str, latency_seconds: f64) {
    counter!(
        "upstream_requests_total",
        "provider" => provider.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(
        "upstream_latency_seconds",
        "provider" => provider.to_string()
    )
    .record(latency_seconds);
}

// ============================================================================
// API Metrics
// ============================================================================

/// Record an HTTP API request.
///
/// # Arguments
///
/// * `route` - Request path (e.g., "/delta-strike")
/// * `status` - Response status code
pub fn record_api_request(route: &str, status: u16) {
    counter!(
        "api_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

// ============================================================================
// Interpolation Metrics
// ============================================================================

/// Record a strike selection.
///
/// # Arguments
///
/// * `method` - "exact", "interpolated" or "clamped"
pub fn record_interpolation(method: &str) {
    counter!(
        "interpolations_total",
        "method" => method.to_string()
    )
    .increment(1);
}
