//! Configuration module for strike-finder.
//!
//! YAML configuration with environment variable interpolation. Every field
//! has a default, so running without a config file is fine.
//!
//! # Usage
//!
//! ```rust,ignore
//! use strike_finder::config::load_config;
//!
//! // --config path, else ./config.yaml if present, else defaults
//! let config = load_config(None)?;
//!
//! println!("HTTP port: {}", config.server.http_port);
//! ```

mod interpolation;
mod observability;
mod server;
mod upstream;

use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use interpolation::InterpolationConfig;
pub use observability::{LoggingConfig, MetricsSettings, ObservabilityConfig};
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Largest accepted exact-match tolerance (exclusive).
const MAX_DELTA_TOLERANCE: Decimal = dec!(0.5);

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// API server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Data provider configuration.
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Strike interpolation configuration.
    #[serde(default)]
    pub interpolation: InterpolationConfig,
    /// Logging and metrics configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Without one, `config.yaml`
///   is used if it exists, else built-in defaults.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => DEFAULT_CONFIG_PATH,
        None => {
            let config = Config::default();
            validate_config(&config)?;
            return Ok(config);
        }
    };

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    // An empty or comment-only file parses as null
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str::<Option<Config>>(&interpolated)?.unwrap_or_default()
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.upstream.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "upstream.timeout_secs must be positive".to_string(),
        ));
    }

    for (field, url) in [
        ("upstream.nasdaq_base_url", &config.upstream.nasdaq_base_url),
        ("upstream.yahoo_base_url", &config.upstream.yahoo_base_url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "{field} must be an http(s) URL, got '{url}'"
            )));
        }
    }

    let tolerance = config.interpolation.delta_tolerance;
    if tolerance < Decimal::ZERO || tolerance >= MAX_DELTA_TOLERANCE {
        return Err(ConfigError::ValidationError(format!(
            "interpolation.delta_tolerance must be in [0, {MAX_DELTA_TOLERANCE}), got {tolerance}"
        )));
    }

    let metrics = &config.observability.metrics;
    if metrics.enabled && metrics.socket_addr()?.port() == config.server.http_port {
        return Err(ConfigError::ValidationError(
            "observability.metrics.listen_addr and server.http_port must be different".to_string(),
        ));
    }

    Ok(())
}
