//! Qloo Client
//!
//! Taste-graph recommendations, the preferred source for similar movies.
//! One logical lookup is two calls: entity search (title → entity URN) then
//! insights recommendations for that URN.
//!
//! Qloo only returns names, so results carry no poster or overview.

use crate::providers::http::{endpoint, require_key, send_json};
use crate::types::{MatchContext, MovieSummary, Provider, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Qloo API base URL
const QLOO_API_URL: &str = "https://hackathon.api.qloo.com";

/// Entity type URN for movies
const MOVIE_ENTITY_TYPE: &str = "urn:entity:movie";

pub struct QlooClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl QlooClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: QLOO_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Entity URN of the best match for `name`
    async fn search_entity(&self, name: &str) -> Result<Option<String>, ProviderError> {
        let key = require_key(&self.api_key, "Qloo")?;
        let query = title_case(name);
        let request = self
            .http
            .get(endpoint(&self.base_url, "search"))
            .header("X-API-Key", key)
            .query(&[("query", query.as_str()), ("types", MOVIE_ENTITY_TYPE)]);

        let response: QlooSearchResponse = send_json(request, "Qloo").await?;
        Ok(response.results.into_iter().find_map(|r| r.id))
    }

    /// Movie recommendations for an entity URN
    async fn recommendations(&self, entity_urn: &str) -> Result<Vec<String>, ProviderError> {
        let key = require_key(&self.api_key, "Qloo")?;
        let request = self
            .http
            .post(endpoint(&self.base_url, "v1/insights/recommendations"))
            .header("X-API-Key", key)
            .json(&json!({
                "entities": [entity_urn],
                "type": "movie",
            }));

        let response: QlooRecommendationResponse = send_json(request, "Qloo").await?;
        Ok(response
            .results
            .into_iter()
            .filter_map(|r| r.name)
            .map(|n| n.to_lowercase())
            .collect())
    }
}

#[async_trait]
impl Provider<MovieSummary> for QlooClient {
    fn name(&self) -> &'static str {
        "Qloo"
    }

    async fn fetch(
        &self,
        ctx: &MatchContext,
        query: &str,
        count: usize,
    ) -> Result<Vec<MovieSummary>, ProviderError> {
        let Some(urn) = self.search_entity(query).await? else {
            debug!(session_id = %ctx.session_id, query = %query, "Qloo entity not found");
            return Ok(Vec::new());
        };

        Ok(self
            .recommendations(&urn)
            .await?
            .into_iter()
            .take(count)
            .map(MovieSummary::named)
            .collect())
    }
}

/// Capitalize each whitespace-separated word ("the matrix" → "The Matrix")
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Qloo API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct QlooSearchResponse {
    #[serde(default)]
    results: Vec<QlooEntity>,
}

#[derive(Debug, Deserialize)]
struct QlooEntity {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QlooRecommendationResponse {
    #[serde(default)]
    results: Vec<QlooRecommendation>,
}

#[derive(Debug, Deserialize)]
struct QlooRecommendation {
    name: Option<String>,
}
