//! Pixabay Client
//!
//! Last resort for outfit photos. Pixabay takes its key as a query parameter
//! and only accepts `per_page` between 3 and 200, so smaller requests are
//! widened and truncated locally.

use crate::providers::http::{endpoint, require_key, send_json};
use crate::types::{ImageResult, MatchContext, Provider, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Pixabay API base URL
const PIXABAY_API_URL: &str = "https://pixabay.com";

const MIN_PER_PAGE: usize = 3;
const MAX_PER_PAGE: usize = 200;

pub struct PixabayClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl PixabayClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: PIXABAY_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Provider<ImageResult> for PixabayClient {
    fn name(&self) -> &'static str {
        "Pixabay"
    }

    async fn fetch(
        &self,
        _ctx: &MatchContext,
        query: &str,
        count: usize,
    ) -> Result<Vec<ImageResult>, ProviderError> {
        let key = require_key(&self.api_key, "Pixabay")?;
        let per_page = count.clamp(MIN_PER_PAGE, MAX_PER_PAGE).to_string();
        let request = self
            .http
            .get(endpoint(&self.base_url, "api/"))
            .query(&[
                ("key", key),
                ("q", query),
                ("image_type", "photo"),
                ("per_page", per_page.as_str()),
            ]);

        let response: PixabaySearchResponse = send_json(request, "Pixabay").await?;
        Ok(normalize(response, count))
    }
}

fn normalize(response: PixabaySearchResponse, count: usize) -> Vec<ImageResult> {
    response
        .hits
        .into_iter()
        .map(|hit| ImageResult {
            full_url: hit.large_image_url.unwrap_or_else(|| hit.webformat_url.clone()),
            thumbnail_url: hit.webformat_url,
        })
        .take(count)
        .collect()
}

// ============================================================================
// Pixabay API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct PixabaySearchResponse {
    #[serde(default)]
    hits: Vec<PixabayHit>,
}

#[derive(Debug, Deserialize)]
struct PixabayHit {
    #[serde(rename = "webformatURL")]
    webformat_url: String,
    #[serde(rename = "largeImageURL")]
    large_image_url: Option<String>,
}
