//! Upstream data provider configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::infrastructure::upstream::DEFAULT_USER_AGENT;
use crate::infrastructure::{nasdaq, yahoo};

/// Base URLs and HTTP client settings for the data providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Nasdaq API base URL.
    #[serde(default = "default_nasdaq_base_url")]
    pub nasdaq_base_url: String,
    /// Yahoo chart API base URL.
    #[serde(default = "default_yahoo_base_url")]
    pub yahoo_base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User-Agent sent upstream. Both providers reject obvious bots.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            nasdaq_base_url: default_nasdaq_base_url(),
            yahoo_base_url: default_yahoo_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl UpstreamConfig {
    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_nasdaq_base_url() -> String {
    nasdaq::DEFAULT_BASE_URL.to_string()
}

fn default_yahoo_base_url() -> String {
    yahoo::DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    20
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
