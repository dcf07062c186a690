//! Test Helper Utilities
//!
//! Stub providers for building an [`AppState`] without network access, plus
//! response decoding shared by the integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use stw_match::catalog::StyleCatalog;
use stw_match::types::{
    ImageResult, MatchContext, MovieCatalog, MovieMetadata, MovieSummary, MusicGenreSource,
    Provider, ProviderError, SongGenres, StreamingAvailability, StreamingOffer, TrackLookup,
    TrackSummary,
};
use stw_match::{AppState, Providers};
use tower::util::ServiceExt;

/// Generic cascade step: fixed items or a failure, counting calls
pub struct StubProvider<T> {
    name: &'static str,
    items: Option<Vec<T>>,
    calls: AtomicUsize,
}

impl<T: Clone + Send + Sync + 'static> StubProvider<T> {
    pub fn returning(name: &'static str, items: Vec<T>) -> Arc<Self> {
        Arc::new(Self {
            name,
            items: Some(items),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            items: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl<T: Clone + Send + Sync + 'static> Provider<T> for StubProvider<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(
        &self,
        _ctx: &MatchContext,
        _query: &str,
        count: usize,
    ) -> Result<Vec<T>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.items {
            Some(items) => Ok(items.iter().take(count).cloned().collect()),
            None => Err(ProviderError::Network(format!("{} unreachable", self.name))),
        }
    }
}

/// TMDB stand-in: "Superbad" is a comedy, popular comedies, one offer in GB
pub struct StubMovies {
    pub metadata_calls: AtomicUsize,
}

#[async_trait::async_trait]
impl MovieMetadata for StubMovies {
    async fn genre_ids_for_title(
        &self,
        _ctx: &MatchContext,
        title: &str,
    ) -> Result<Vec<u32>, ProviderError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        match title {
            "Superbad" => Ok(vec![35]),
            "Broken" => Err(ProviderError::Status {
                status: 500,
                message: "TMDB: boom".to_string(),
            }),
            _ => Ok(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl MovieCatalog for StubMovies {
    async fn popular_by_genre(
        &self,
        _ctx: &MatchContext,
        genre_id: u32,
    ) -> Result<Vec<MovieSummary>, ProviderError> {
        if genre_id == 35 {
            Ok(vec![MovieSummary::named("Superbad")])
        } else {
            Ok(Vec::new())
        }
    }

    async fn streaming_availability(
        &self,
        ctx: &MatchContext,
        _movie_id: u64,
    ) -> Result<StreamingAvailability, ProviderError> {
        if ctx.country_code != "GB" {
            return Ok(StreamingAvailability::default());
        }
        Ok(StreamingAvailability {
            offers: vec![StreamingOffer {
                provider_name: "Netflix".to_string(),
                logo_url: None,
            }],
            link: Some("https://www.themoviedb.org/movie/8363/watch?locale=GB".to_string()),
        })
    }
}

/// Spotify stand-in for genre detection and enrichment
pub struct StubSpotify;

#[async_trait::async_trait]
impl MusicGenreSource for StubSpotify {
    async fn song_genres(
        &self,
        _ctx: &MatchContext,
        song: &str,
    ) -> Result<Option<SongGenres>, ProviderError> {
        match song {
            "Smells Like Teen Spirit" => Ok(Some(SongGenres {
                track_label: "Smells Like Teen Spirit - Nirvana".to_string(),
                genres: vec!["grunge".to_string(), "alternative rock".to_string()],
            })),
            _ => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl TrackLookup for StubSpotify {
    async fn lookup_track(
        &self,
        _ctx: &MatchContext,
        _query: &str,
    ) -> Result<Option<TrackSummary>, ProviderError> {
        Ok(None)
    }
}

pub fn image(url: &str) -> ImageResult {
    ImageResult {
        thumbnail_url: url.to_string(),
        full_url: format!("{}-full", url),
    }
}

pub fn track(title: &str, artist: &str) -> TrackSummary {
    TrackSummary {
        title: title.to_string(),
        artist: artist.to_string(),
        external_id: None,
        url: None,
        album_image_url: None,
        preview_url: None,
    }
}

/// Providers with every cascade wired to stubs
pub struct TestProviders {
    pub movies: Arc<StubMovies>,
    pub qloo: Arc<StubProvider<MovieSummary>>,
    pub tmdb_similar: Arc<StubProvider<MovieSummary>>,
    pub unsplash: Arc<StubProvider<ImageResult>>,
    pub pexels: Arc<StubProvider<ImageResult>>,
    pub pixabay: Arc<StubProvider<ImageResult>>,
    pub lastfm: Arc<StubProvider<TrackSummary>>,
    pub spotify_similar: Arc<StubProvider<TrackSummary>>,
}

impl TestProviders {
    /// Qloo fails, Unsplash is empty, Last.fm is empty
    pub fn new() -> Self {
        Self {
            movies: Arc::new(StubMovies {
                metadata_calls: AtomicUsize::new(0),
            }),
            qloo: StubProvider::failing("Qloo"),
            tmdb_similar: StubProvider::returning(
                "TMDB",
                vec![MovieSummary::named("Pineapple Express")],
            ),
            unsplash: StubProvider::returning("Unsplash", Vec::new()),
            pexels: StubProvider::returning("Pexels", vec![image("url1")]),
            pixabay: StubProvider::returning("Pixabay", vec![image("url2")]),
            lastfm: StubProvider::returning("Last.fm", Vec::new()),
            spotify_similar: StubProvider::returning(
                "Spotify",
                vec![track("Lithium", "Nirvana")],
            ),
        }
    }

    pub fn providers(&self) -> Providers {
        fn step<T>(p: &Arc<StubProvider<T>>) -> Arc<dyn Provider<T>>
        where
            T: Clone + Send + Sync + 'static,
        {
            p.clone()
        }

        Providers {
            movie_metadata: self.movies.clone(),
            movie_catalog: self.movies.clone(),
            similar_movies: vec![step(&self.qloo), step(&self.tmdb_similar)],
            images: vec![step(&self.unsplash), step(&self.pexels), step(&self.pixabay)],
            similar_songs: vec![step(&self.lastfm), step(&self.spotify_similar)],
            music_genres: Arc::new(StubSpotify),
            track_lookup: Arc::new(StubSpotify),
        }
    }

    pub fn app(&self) -> axum::Router {
        let state = AppState::new(StyleCatalog::builtin(), self.providers(), "us");
        stw_match::build_router(state)
    }
}

/// Send one request and decode the JSON body
pub async fn send(app: axum::Router, request: Request<Body>) -> (Response<()>, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (Response::from_parts(parts, ()), json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
