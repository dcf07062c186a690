//! stw-match library interface
//!
//! Exposes the catalog, resolver, provider cascades and HTTP router so the
//! binary and integration tests share one wiring.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod providers;
pub mod services;
pub mod types;

pub use crate::error::{ApiError, ApiResult};

use crate::catalog::StyleCatalog;
use crate::config::ProviderKeys;
use crate::providers::{
    LastFmClient, PexelsClient, PixabayClient, QlooClient, SpotifyClient, TmdbClient,
    UnsplashClient,
};
use crate::services::{ArchetypeResolver, ProviderCascade, SongMatcher, StyleLookbook};
use crate::types::{
    ImageResult, MatchContext, MovieCatalog, MovieMetadata, MovieSummary, MusicGenreSource,
    Provider, TrackLookup, TrackSummary,
};
use axum::Router;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// External collaborators behind their trait seams
///
/// Cascade lists are in priority order.
pub struct Providers {
    pub movie_metadata: Arc<dyn MovieMetadata>,
    pub movie_catalog: Arc<dyn MovieCatalog>,
    pub similar_movies: Vec<Arc<dyn Provider<MovieSummary>>>,
    pub images: Vec<Arc<dyn Provider<ImageResult>>>,
    pub similar_songs: Vec<Arc<dyn Provider<TrackSummary>>>,
    pub music_genres: Arc<dyn MusicGenreSource>,
    pub track_lookup: Arc<dyn TrackLookup>,
}

impl Providers {
    /// Real HTTP clients sharing one `reqwest::Client`
    ///
    /// | need           | order                        |
    /// |----------------|------------------------------|
    /// | similar movies | Qloo → TMDB                  |
    /// | images         | Unsplash → Pexels → Pixabay  |
    /// | similar songs  | Last.fm → Spotify            |
    pub fn from_keys(http: Client, keys: &ProviderKeys, image_variety: bool) -> Self {
        let tmdb = Arc::new(TmdbClient::new(http.clone(), keys.tmdb.clone()));
        let spotify = Arc::new(SpotifyClient::new(
            http.clone(),
            keys.spotify_client_id.clone(),
            keys.spotify_client_secret.clone(),
        ));

        let similar_movies: Vec<Arc<dyn Provider<MovieSummary>>> = vec![
            Arc::new(QlooClient::new(http.clone(), keys.qloo.clone())),
            tmdb.clone(),
        ];
        let images: Vec<Arc<dyn Provider<ImageResult>>> = vec![
            Arc::new(
                UnsplashClient::new(http.clone(), keys.unsplash.clone())
                    .with_variety(image_variety),
            ),
            Arc::new(PexelsClient::new(http.clone(), keys.pexels.clone())),
            Arc::new(PixabayClient::new(http.clone(), keys.pixabay.clone())),
        ];
        let similar_songs: Vec<Arc<dyn Provider<TrackSummary>>> = vec![
            Arc::new(LastFmClient::new(http, keys.lastfm.clone())),
            spotify.clone(),
        ];

        Self {
            movie_metadata: tmdb.clone(),
            movie_catalog: tmdb,
            similar_movies,
            images,
            similar_songs,
            music_genres: spotify.clone(),
            track_lookup: spotify,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<StyleCatalog>,
    pub resolver: Arc<ArchetypeResolver>,
    pub similar_movies: Arc<ProviderCascade<MovieSummary>>,
    pub movie_catalog: Arc<dyn MovieCatalog>,
    pub songs: Arc<SongMatcher>,
    pub lookbook: Arc<StyleLookbook>,
    /// Country for requests that do not name one
    pub default_country: String,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(catalog: Arc<StyleCatalog>, providers: Providers, default_country: &str) -> Self {
        let resolver = Arc::new(ArchetypeResolver::new(
            Arc::clone(&catalog),
            providers.movie_metadata,
        ));
        let similar_songs = Arc::new(ProviderCascade::new(
            "similar songs",
            providers.similar_songs,
        ));
        let images = Arc::new(ProviderCascade::new("images", providers.images));

        Self {
            songs: Arc::new(SongMatcher::new(
                Arc::clone(&resolver),
                providers.music_genres,
                similar_songs,
                providers.track_lookup,
            )),
            lookbook: Arc::new(StyleLookbook::new(Arc::clone(&catalog), images)),
            similar_movies: Arc::new(ProviderCascade::new(
                "similar movies",
                providers.similar_movies,
            )),
            movie_catalog: providers.movie_catalog,
            resolver,
            catalog,
            default_country: default_country.trim().to_uppercase(),
            startup_time: Utc::now(),
        }
    }

    /// Request context for a session, falling back to the default country
    pub fn context(&self, session_id: Uuid, country: Option<&str>) -> MatchContext {
        let country = country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(self.default_country.as_str());
        MatchContext::new(session_id, country)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::archetype_routes())
        .merge(api::movie_routes())
        .merge(api::song_routes())
        .merge(api::style_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
