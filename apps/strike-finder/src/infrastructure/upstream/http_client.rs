//! HTTP client for upstream JSON endpoints.
//!
//! One GET per call, no retries. Failures carry the final URL and the start
//! of the response body so bot blocks (HTML instead of JSON) are visible.

use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::application::ports::MarketDataError;
use crate::observability::record_upstream_request;

/// Longest body excerpt kept in error messages, in characters.
pub const SNIPPET_CHARS: usize = 500;

/// Browser-like User-Agent; several providers reject library defaults.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// A decoded JSON body and the URL it was fetched from.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    /// Decoded body.
    pub body: T,
    /// Final request URL, query string included.
    pub url: String,
}

/// GET-only JSON client for one provider.
#[derive(Debug, Clone)]
pub struct UpstreamHttpClient {
    client: Client,
    provider: &'static str,
}

impl UpstreamHttpClient {
    /// Create a client for `provider`, which labels logs and metrics.
    pub fn new(
        provider: &'static str,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, MarketDataError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json,text/plain,*/*"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| MarketDataError::Client(e.to_string()))?;

        Ok(Self { client, provider })
    }

    /// Provider label.
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        self.provider
    }

    /// GET `url` with `query` and decode the body as `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Fetched<T>, MarketDataError> {
        let request = self
            .client
            .get(url)
            .query(query)
            .build()
            .map_err(|e| MarketDataError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        let request_url = request.url().to_string();

        tracing::debug!(provider = self.provider, url = %request_url, "Upstream GET");
        let started = Instant::now();

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                self.record("network_error", started);
                tracing::warn!(provider = self.provider, url = %request_url, error = %e, "Upstream request failed");
                return Err(MarketDataError::Network {
                    url: request_url,
                    message: e.to_string(),
                });
            }
        };

        let status = response.status();
        let final_url = response.url().to_string();
        let text = response.text().await.map_err(|e| {
            self.record("network_error", started);
            MarketDataError::Network {
                url: final_url.clone(),
                message: e.to_string(),
            }
        })?;

        if !status.is_success() {
            self.record("http_error", started);
            tracing::warn!(
                provider = self.provider,
                url = %final_url,
                status = status.as_u16(),
                "Upstream returned error status"
            );
            return Err(MarketDataError::Status {
                status: status.as_u16(),
                url: final_url,
                snippet: snippet(&text),
            });
        }

        match serde_json::from_str(&text) {
            Ok(body) => {
                self.record("ok", started);
                Ok(Fetched {
                    body,
                    url: final_url,
                })
            }
            Err(e) => {
                self.record("invalid_json", started);
                Err(MarketDataError::InvalidJson {
                    url: final_url,
                    message: e.to_string(),
                    snippet: snippet(&text),
                })
            }
        }
    }

    fn record(&self, outcome: &str, started: Instant) {
        record_upstream_request(self.provider, outcome, started.elapsed().as_secs_f64());
    }
}

/// First [`SNIPPET_CHARS`] characters of a body, trimmed.
#[must_use]
pub fn snippet(body: &str) -> String {
    body.trim().chars().take(SNIPPET_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_truncates_by_characters() {
        let body = "é".repeat(600);
        assert_eq!(snippet(&body).chars().count(), SNIPPET_CHARS);
    }

    #[test]
    fn snippet_keeps_short_bodies() {
        assert_eq!(snippet("  <html>blocked</html>\n"), "<html>blocked</html>");
    }

    #[test]
    fn client_builds_with_browser_agent() {
        let client =
            UpstreamHttpClient::new("nasdaq", Duration::from_secs(5), DEFAULT_USER_AGENT).unwrap();
        assert_eq!(client.provider(), "nasdaq");
    }
}
