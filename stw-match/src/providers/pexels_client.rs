//! Pexels Client
//!
//! Second choice for outfit photos.

use crate::providers::http::{endpoint, require_key, send_json};
use crate::types::{ImageResult, MatchContext, Provider, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Pexels API base URL
const PEXELS_API_URL: &str = "https://api.pexels.com";

pub struct PexelsClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl PexelsClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: PEXELS_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Provider<ImageResult> for PexelsClient {
    fn name(&self) -> &'static str {
        "Pexels"
    }

    async fn fetch(
        &self,
        _ctx: &MatchContext,
        query: &str,
        count: usize,
    ) -> Result<Vec<ImageResult>, ProviderError> {
        let key = require_key(&self.api_key, "Pexels")?;
        let per_page = count.to_string();
        let request = self
            .http
            .get(endpoint(&self.base_url, "v1/search"))
            .header("Authorization", key)
            .query(&[("query", query), ("per_page", per_page.as_str())]);

        let response: PexelsSearchResponse = send_json(request, "Pexels").await?;
        Ok(normalize(response, count))
    }
}

fn normalize(response: PexelsSearchResponse, count: usize) -> Vec<ImageResult> {
    response
        .photos
        .into_iter()
        .map(|photo| ImageResult {
            full_url: photo.src.large.unwrap_or_else(|| photo.src.medium.clone()),
            thumbnail_url: photo.src.medium,
        })
        .take(count)
        .collect()
}

// ============================================================================
// Pexels API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct PexelsSearchResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    src: PexelsSource,
}

#[derive(Debug, Deserialize)]
struct PexelsSource {
    medium: String,
    large: Option<String>,
}
