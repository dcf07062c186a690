//! Unsplash Client
//!
//! First choice for outfit photos. With variety enabled each search picks a
//! random result page (1-5) and appends a random numeric suffix to the query,
//! so refreshing a style shows different looks.

use crate::providers::http::{endpoint, require_key, send_json};
use crate::types::{ImageResult, MatchContext, Provider, ProviderError};
use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Unsplash API base URL
const UNSPLASH_API_URL: &str = "https://api.unsplash.com";

pub struct UnsplashClient {
    http: Client,
    access_key: String,
    base_url: String,
    variety: bool,
}

impl UnsplashClient {
    pub fn new(http: Client, access_key: impl Into<String>) -> Self {
        Self {
            http,
            access_key: access_key.into(),
            base_url: UNSPLASH_API_URL.to_string(),
            variety: true,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_variety(mut self, variety: bool) -> Self {
        self.variety = variety;
        self
    }

    /// Query text and page number for one search
    fn search_terms(&self, query: &str) -> (String, u32) {
        if !self.variety {
            return (query.to_string(), 1);
        }
        let mut rng = rand::thread_rng();
        let page = rng.gen_range(1..=5);
        let suffix: u32 = rng.gen_range(0..=10_000);
        (format!("{} {}", query, suffix), page)
    }
}

#[async_trait]
impl Provider<ImageResult> for UnsplashClient {
    fn name(&self) -> &'static str {
        "Unsplash"
    }

    async fn fetch(
        &self,
        ctx: &MatchContext,
        query: &str,
        count: usize,
    ) -> Result<Vec<ImageResult>, ProviderError> {
        let key = require_key(&self.access_key, "Unsplash")?;
        let (search_query, page) = self.search_terms(query);
        debug!(
            session_id = %ctx.session_id,
            query = %search_query,
            page = page,
            "Searching Unsplash"
        );

        let per_page = count.to_string();
        let page = page.to_string();
        let request = self
            .http
            .get(endpoint(&self.base_url, "search/photos"))
            .header("Authorization", format!("Client-ID {}", key))
            .query(&[
                ("query", search_query.as_str()),
                ("per_page", per_page.as_str()),
                ("page", page.as_str()),
            ]);

        let response: UnsplashSearchResponse = send_json(request, "Unsplash").await?;
        Ok(normalize(response, count))
    }
}

fn normalize(response: UnsplashSearchResponse, count: usize) -> Vec<ImageResult> {
    response
        .results
        .into_iter()
        .map(|photo| ImageResult {
            thumbnail_url: photo.urls.small.clone().unwrap_or_else(|| photo.urls.regular.clone()),
            full_url: photo.urls.regular,
        })
        .take(count)
        .collect()
}

// ============================================================================
// Unsplash API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct UnsplashSearchResponse {
    #[serde(default)]
    results: Vec<UnsplashPhoto>,
}

#[derive(Debug, Deserialize)]
struct UnsplashPhoto {
    urls: UnsplashUrls,
}

#[derive(Debug, Deserialize)]
struct UnsplashUrls {
    regular: String,
    small: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize() {
        let response: UnsplashSearchResponse = serde_json::from_value(json!({
            "total": 2,
            "results": [
                { "urls": { "regular": "https://u/1-regular", "small": "https://u/1-small" } },
                { "urls": { "regular": "https://u/2-regular" } }
            ]
        }))
        .unwrap();

        let images = normalize(response, 5);
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].thumbnail_url, "https://u/1-small");
        assert_eq!(images[0].full_url, "https://u/1-regular");
        assert_eq!(images[1].thumbnail_url, "https://u/2-regular");
    }

    #[test]
    fn test_normalize_respects_count() {
        let response: UnsplashSearchResponse = serde_json::from_value(json!({
            "results": [
                { "urls": { "regular": "a" } },
                { "urls": { "regular": "b" } }
            ]
        }))
        .unwrap();
        assert_eq!(normalize(response, 1).len(), 1);
    }

    #[test]
    fn test_search_terms_without_variety() {
        let client = UnsplashClient::new(Client::new(), "key").with_variety(false);
        assert_eq!(client.search_terms("boho fashion"), ("boho fashion".to_string(), 1));
    }

    #[test]
    fn test_search_terms_with_variety() {
        let client = UnsplashClient::new(Client::new(), "key");
        let (query, page) = client.search_terms("boho fashion");
        assert!(query.starts_with("boho fashion "));
        assert!((1..=5).contains(&page));
    }
}
