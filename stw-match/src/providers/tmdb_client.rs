//! TMDB Client
//!
//! The Movie Database (API v3) backs four lookups:
//! - title search → first match genre ids (resolver movie path)
//! - similar movies: title search → `/movie/{id}/recommendations` (cascade step)
//! - popular titles for a genre in a region (`/discover/movie`)
//! - streaming offers for a title in a region (`/movie/{id}/watch/providers`)
//!
//! # API Reference
//! - Endpoint: https://api.themoviedb.org/3
//! - Images: https://image.tmdb.org/t/p/{size}{path}

use crate::providers::http::{endpoint, require_key, send_json};
use crate::types::{
    MatchContext, MovieCatalog, MovieMetadata, MovieSummary, Provider, ProviderError,
    StreamingAvailability, StreamingOffer,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// TMDB API base URL
const TMDB_API_URL: &str = "https://api.themoviedb.org/3";

/// TMDB image CDN base URL
const TMDB_IMAGE_URL: &str = "https://image.tmdb.org/t/p";

/// Poster size used for movie cards
const POSTER_SIZE: &str = "w200";

/// Logo size used for streaming providers
const LOGO_SIZE: &str = "w45";

pub struct TmdbClient {
    http: Client,
    api_key: String,
    base_url: String,
    image_base_url: String,
}

impl TmdbClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: TMDB_API_URL.to_string(),
            image_base_url: TMDB_IMAGE_URL.to_string(),
        }
    }

    /// Point the client at another API host (tests, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `GET /search/movie`
    async fn search(&self, title: &str) -> Result<Vec<TmdbMovie>, ProviderError> {
        let key = require_key(&self.api_key, "TMDB")?;
        let request = self
            .http
            .get(endpoint(&self.base_url, "search/movie"))
            .query(&[("api_key", key), ("query", title), ("include_adult", "false")]);

        let page: TmdbPage = send_json(request, "TMDB").await?;
        debug!(title = %title, results = page.results.len(), "TMDB title search");
        Ok(page.results)
    }

    /// `GET /movie/{id}/recommendations`
    async fn recommendations(&self, movie_id: u64) -> Result<Vec<TmdbMovie>, ProviderError> {
        let key = require_key(&self.api_key, "TMDB")?;
        let request = self
            .http
            .get(endpoint(&self.base_url, &format!("movie/{}/recommendations", movie_id)))
            .query(&[("api_key", key)]);

        let page: TmdbPage = send_json(request, "TMDB").await?;
        Ok(page.results)
    }

    fn summarize(&self, movie: TmdbMovie) -> MovieSummary {
        normalize_movie(movie, &self.image_base_url)
    }
}

#[async_trait]
impl MovieMetadata for TmdbClient {
    async fn genre_ids_for_title(
        &self,
        _ctx: &MatchContext,
        title: &str,
    ) -> Result<Vec<u32>, ProviderError> {
        Ok(self
            .search(title)
            .await?
            .into_iter()
            .next()
            .map(|m| m.genre_ids)
            .unwrap_or_default())
    }
}

#[async_trait]
impl Provider<MovieSummary> for TmdbClient {
    fn name(&self) -> &'static str {
        "TMDB"
    }

    async fn fetch(
        &self,
        ctx: &MatchContext,
        query: &str,
        count: usize,
    ) -> Result<Vec<MovieSummary>, ProviderError> {
        let Some(first) = self.search(query).await?.into_iter().next() else {
            return Ok(Vec::new());
        };

        debug!(
            session_id = %ctx.session_id,
            movie_id = first.id,
            "Fetching TMDB recommendations"
        );

        Ok(self
            .recommendations(first.id)
            .await?
            .into_iter()
            .take(count)
            .map(|m| self.summarize(m))
            .collect())
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn popular_by_genre(
        &self,
        ctx: &MatchContext,
        genre_id: u32,
    ) -> Result<Vec<MovieSummary>, ProviderError> {
        let key = require_key(&self.api_key, "TMDB")?;
        let genre_id = genre_id.to_string();
        let request = self
            .http
            .get(endpoint(&self.base_url, "discover/movie"))
            .query(&[
                ("api_key", key),
                ("with_genres", genre_id.as_str()),
                ("region", ctx.country_code.as_str()),
                ("sort_by", "popularity.desc"),
                ("language", "en-US"),
            ]);

        let page: TmdbPage = send_json(request, "TMDB").await?;
        Ok(page.results.into_iter().map(|m| self.summarize(m)).collect())
    }

    async fn streaming_availability(
        &self,
        ctx: &MatchContext,
        movie_id: u64,
    ) -> Result<StreamingAvailability, ProviderError> {
        let key = require_key(&self.api_key, "TMDB")?;
        let request = self
            .http
            .get(endpoint(&self.base_url, &format!("movie/{}/watch/providers", movie_id)))
            .query(&[("api_key", key)]);

        let response: WatchProvidersResponse = send_json(request, "TMDB").await?;
        Ok(normalize_availability(
            response,
            &ctx.country_code,
            &self.image_base_url,
        ))
    }
}

// ============================================================================
// Normalization
// ============================================================================

fn image_url(image_base_url: &str, size: &str, path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{}/{}{}", image_base_url.trim_end_matches('/'), size, p))
}

fn normalize_movie(movie: TmdbMovie, image_base_url: &str) -> MovieSummary {
    MovieSummary {
        poster_url: image_url(image_base_url, POSTER_SIZE, movie.poster_path.as_deref()),
        title: movie.title.unwrap_or_else(|| "Untitled".to_string()),
        external_id: Some(movie.id.to_string()),
        overview: movie.overview.unwrap_or_default(),
    }
}

fn normalize_availability(
    mut response: WatchProvidersResponse,
    country_code: &str,
    image_base_url: &str,
) -> StreamingAvailability {
    let Some(region) = response.results.remove(country_code) else {
        return StreamingAvailability::default();
    };

    StreamingAvailability {
        offers: region
            .flatrate
            .into_iter()
            .map(|p| StreamingOffer {
                logo_url: image_url(image_base_url, LOGO_SIZE, p.logo_path.as_deref()),
                provider_name: p.provider_name,
            })
            .collect(),
        link: region.link,
    }
}

// ============================================================================
// TMDB API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbPage {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: u64,
    title: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct WatchProvidersResponse {
    #[serde(default)]
    results: HashMap<String, WatchRegion>,
}

#[derive(Debug, Deserialize)]
struct WatchRegion {
    #[serde(default)]
    flatrate: Vec<WatchProvider>,
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WatchProvider {
    provider_name: String,
    logo_path: Option<String>,
}
