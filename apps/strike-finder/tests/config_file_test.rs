//! Loading configuration from files on disk.

#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::path::PathBuf;

use rust_decimal_macros::dec;
use tempfile::NamedTempFile;

use strike_finder::config::{ConfigError, load_config};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_file_with_env_defaults() {
    let file = write_config(
        r#"
server:
  bind_address: "127.0.0.1"
  http_port: ${STRIKE_FINDER_FILE_TEST_PORT_UNSET:-3100}

upstream:
  nasdaq_base_url: "${STRIKE_FINDER_FILE_TEST_NASDAQ_UNSET:-http://localhost:9000}"
  timeout_secs: 7

interpolation:
  delta_tolerance: "0.001"

observability:
  logging:
    level: "${STRIKE_FINDER_FILE_TEST_LEVEL_UNSET:-debug}"
"#,
    );

    let config = load_config(file.path().to_str()).unwrap();

    assert_eq!(config.server.bind_address, "127.0.0.1");
    assert_eq!(config.server.http_port, 3100);
    assert_eq!(config.upstream.nasdaq_base_url, "http://localhost:9000");
    assert_eq!(
        config.upstream.yahoo_base_url,
        "https://query1.finance.yahoo.com"
    );
    assert_eq!(config.upstream.timeout_secs, 7);
    assert_eq!(config.interpolation.delta_tolerance, dec!(0.001));
    assert_eq!(config.observability.logging.level, "debug");
}

#[test]
fn example_config_is_valid() {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("config.example.yaml");

    let config = load_config(path.to_str()).unwrap();

    assert_eq!(config.server.http_port, 8080);
    assert!(!config.observability.metrics.enabled);
}

#[test]
fn malformed_yaml_is_parse_error() {
    let file = write_config("server: [not, a, map\n");

    let Err(err) = load_config(file.path().to_str()) else {
        panic!("expected parse error");
    };
    assert!(matches!(err, ConfigError::ParseError(_)));
}

#[test]
fn invalid_values_fail_validation() {
    let file = write_config(
        r"
upstream:
  nasdaq_base_url: api.nasdaq.com
",
    );

    let Err(err) = load_config(file.path().to_str()) else {
        panic!("expected validation error");
    };
    assert!(matches!(err, ConfigError::ValidationError(_)));
    assert!(err.to_string().contains("nasdaq_base_url"));
}
