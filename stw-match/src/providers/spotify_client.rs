//! Spotify Client
//!
//! Client-credentials token fetch plus three lookups:
//! - track search (similar-songs fallback step)
//! - single-track lookup (enrichment of Last.fm results)
//! - song → artist genres (style detection from a song)
//!
//! The bearer token is cached until shortly before its reported expiry.
//! Nothing is persisted between process runs.

use crate::providers::http::{endpoint, require_key, send_json};
use crate::types::{
    MatchContext, MusicGenreSource, Provider, ProviderError, SongGenres, TrackLookup,
    TrackSummary,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Spotify Web API base URL
const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

/// Spotify accounts service base URL
const SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Refresh this long before the token's reported expiry
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

pub struct SpotifyClient {
    http: Client,
    client_id: String,
    client_secret: String,
    api_url: String,
    accounts_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    pub fn new(
        http: Client,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_url: SPOTIFY_API_URL.to_string(),
            accounts_url: SPOTIFY_ACCOUNTS_URL.to_string(),
            token: Mutex::new(None),
        }
    }

    /// Point the client at other hosts (tests, proxies)
    pub fn with_base_urls(
        mut self,
        api_url: impl Into<String>,
        accounts_url: impl Into<String>,
    ) -> Self {
        self.api_url = api_url.into();
        self.accounts_url = accounts_url.into();
        self
    }

    /// Cached bearer token, fetching a new one when missing or stale
    async fn access_token(&self) -> Result<String, ProviderError> {
        let client_id = require_key(&self.client_id, "Spotify client id")?;
        let client_secret = require_key(&self.client_secret, "Spotify client secret")?;

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let request = self
            .http
            .post(endpoint(&self.accounts_url, "api/token"))
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")]);

        let response: TokenResponse = send_json(request, "Spotify").await?;
        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        debug!(expires_in = response.expires_in, "Spotify token issued");

        *cached = Some(CachedToken {
            access_token: response.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(response.access_token)
    }

    /// `GET /search?type=track`
    async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<SpotifyTrack>, ProviderError> {
        let token = self.access_token().await?;
        let limit = limit.clamp(1, 50).to_string();
        let request = self
            .http
            .get(endpoint(&self.api_url, "search"))
            .bearer_auth(token)
            .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())]);

        let response: SearchResponse = send_json(request, "Spotify").await?;
        Ok(response.tracks.map(|t| t.items).unwrap_or_default())
    }

    /// `GET /artists/{id}`
    async fn artist_genres(&self, artist_id: &str) -> Result<Vec<String>, ProviderError> {
        let token = self.access_token().await?;
        let request = self
            .http
            .get(endpoint(&self.api_url, &format!("artists/{}", artist_id)))
            .bearer_auth(token);

        let artist: SpotifyArtistDetail = send_json(request, "Spotify").await?;
        Ok(artist.genres)
    }
}

#[async_trait]
impl Provider<TrackSummary> for SpotifyClient {
    fn name(&self) -> &'static str {
        "Spotify"
    }

    async fn fetch(
        &self,
        _ctx: &MatchContext,
        query: &str,
        count: usize,
    ) -> Result<Vec<TrackSummary>, ProviderError> {
        Ok(self
            .search_tracks(query, count)
            .await?
            .into_iter()
            .take(count)
            .filter_map(normalize_track)
            .collect())
    }
}

#[async_trait]
impl TrackLookup for SpotifyClient {
    async fn lookup_track(
        &self,
        _ctx: &MatchContext,
        query: &str,
    ) -> Result<Option<TrackSummary>, ProviderError> {
        Ok(self
            .search_tracks(query, 1)
            .await?
            .into_iter()
            .next()
            .and_then(normalize_track))
    }
}

#[async_trait]
impl MusicGenreSource for SpotifyClient {
    async fn song_genres(
        &self,
        ctx: &MatchContext,
        song: &str,
    ) -> Result<Option<SongGenres>, ProviderError> {
        let Some(track) = self.search_tracks(song, 1).await?.into_iter().next() else {
            return Ok(None);
        };
        let Some(artist) = track.artists.first() else {
            return Ok(None);
        };

        let genres = self.artist_genres(&artist.id).await?;
        debug!(
            session_id = %ctx.session_id,
            artist = %artist.name,
            genres = genres.len(),
            "Spotify artist genres"
        );

        Ok(Some(SongGenres {
            track_label: format!("{} - {}", track.name, artist.name),
            genres,
        }))
    }
}

/// Tracks without an artist are dropped
fn normalize_track(track: SpotifyTrack) -> Option<TrackSummary> {
    let artist = track.artists.into_iter().next()?;
    Some(TrackSummary {
        title: track.name,
        artist: artist.name,
        external_id: Some(track.id),
        url: track.external_urls.and_then(|u| u.spotify),
        album_image_url: track
            .album
            .and_then(|a| a.images.into_iter().next())
            .map(|i| i.url),
        preview_url: track.preview_url,
    })
}

// ============================================================================
// Spotify API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<SpotifyTrack>,
}

#[derive(Debug, Deserialize)]
struct SpotifyTrack {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<SpotifyArtist>,
    album: Option<SpotifyAlbum>,
    preview_url: Option<String>,
    external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpotifyAlbum {
    #[serde(default)]
    images: Vec<SpotifyImage>,
}

#[derive(Debug, Deserialize)]
struct SpotifyImage {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtistDetail {
    #[serde(default)]
    genres: Vec<String>,
}
