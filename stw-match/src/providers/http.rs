//! Shared HTTP plumbing for provider adapters
//!
//! One `reqwest::Client` is built at startup and cloned into every adapter.
//! [`send_json`] turns a request into a decoded body or a [`ProviderError`].

use crate::types::ProviderError;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use stw_common::config::is_valid_key;

/// User-Agent sent to every provider
pub const USER_AGENT: &str = concat!("StyleTwin-Match/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Send a request and decode a JSON body
///
/// Non-success statuses keep the first 200 bytes of the body for the log.
pub async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    provider: &'static str,
) -> Result<T, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::Network(format!("{} request failed: {}", provider, e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Status {
            status: status.as_u16(),
            message: format!("{}: {}", provider, truncate(&body, 200)),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::Parse(format!("Failed to parse {} response: {}", provider, e)))
}

/// Borrow a configured key or fail with `NotConfigured`
pub fn require_key<'a>(key: &'a str, provider: &'static str) -> Result<&'a str, ProviderError> {
    if is_valid_key(key) {
        Ok(key)
    } else {
        Err(ProviderError::NotConfigured(format!("{} API key missing", provider)))
    }
}

/// Join a base URL and a path without doubling the slash
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
