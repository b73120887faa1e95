//! Shared HTTP plumbing for upstream data providers.

mod http_client;

pub use http_client::{
    DEFAULT_USER_AGENT, Fetched, SNIPPET_CHARS, UpstreamHttpClient, snippet,
};
