//! Last.fm Client
//!
//! Preferred source for similar songs: `track.search` resolves the query to
//! an artist/track pair, `track.getsimilar` lists related tracks.
//!
//! Last.fm collapses single-element lists into a bare object, so both list
//! fields accept either shape.

use crate::providers::http::{require_key, send_json};
use crate::types::{MatchContext, Provider, ProviderError, TrackSummary};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Last.fm API root
const LASTFM_API_URL: &str = "https://ws.audioscrobbler.com/2.0/";

pub struct LastFmClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl LastFmClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: LASTFM_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Best artist/track match for free text
    async fn search_track(&self, song: &str) -> Result<Option<(String, String)>, ProviderError> {
        let key = require_key(&self.api_key, "Last.fm")?;
        let request = self.http.get(&self.base_url).query(&[
            ("method", "track.search"),
            ("track", song),
            ("api_key", key),
            ("format", "json"),
            ("limit", "1"),
        ]);

        let response: TrackSearchResponse = send_json(request, "Last.fm").await?;
        Ok(response
            .results
            .and_then(|r| r.trackmatches)
            .map(|m| m.track.into_vec())
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|t| (t.artist, t.name)))
    }

    async fn similar_tracks(
        &self,
        artist: &str,
        track: &str,
        limit: usize,
    ) -> Result<Vec<TrackSummary>, ProviderError> {
        let key = require_key(&self.api_key, "Last.fm")?;
        let limit = limit.to_string();
        let request = self.http.get(&self.base_url).query(&[
            ("method", "track.getsimilar"),
            ("artist", artist),
            ("track", track),
            ("api_key", key),
            ("format", "json"),
            ("limit", limit.as_str()),
        ]);

        let response: SimilarTracksResponse = send_json(request, "Last.fm").await?;
        Ok(normalize_similar(response))
    }
}

#[async_trait]
impl Provider<TrackSummary> for LastFmClient {
    fn name(&self) -> &'static str {
        "Last.fm"
    }

    async fn fetch(
        &self,
        ctx: &MatchContext,
        query: &str,
        count: usize,
    ) -> Result<Vec<TrackSummary>, ProviderError> {
        let Some((artist, track)) = self.search_track(query).await? else {
            return Ok(Vec::new());
        };
        debug!(
            session_id = %ctx.session_id,
            artist = %artist,
            track = %track,
            "Last.fm matched track"
        );

        let mut similar = self.similar_tracks(&artist, &track, count).await?;
        similar.truncate(count);
        Ok(similar)
    }
}

fn normalize_similar(response: SimilarTracksResponse) -> Vec<TrackSummary> {
    response
        .similartracks
        .map(|s| s.track.into_vec())
        .unwrap_or_default()
        .into_iter()
        .map(|t| TrackSummary {
            title: t.name.unwrap_or_else(|| "Unknown".to_string()),
            artist: t
                .artist
                .and_then(|a| a.name)
                .unwrap_or_else(|| "Unknown".to_string()),
            external_id: t.mbid.filter(|m| !m.is_empty()),
            url: t.url,
            album_image_url: None,
            preview_url: None,
        })
        .collect()
}

// ============================================================================
// Last.fm API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
struct TrackSearchResponse {
    results: Option<TrackSearchResults>,
}

#[derive(Debug, Deserialize)]
struct TrackSearchResults {
    trackmatches: Option<TrackMatches>,
}

#[derive(Debug, Deserialize)]
struct TrackMatches {
    track: OneOrMany<TrackMatch>,
}

#[derive(Debug, Deserialize)]
struct TrackMatch {
    name: String,
    artist: String,
}

#[derive(Debug, Deserialize)]
struct SimilarTracksResponse {
    similartracks: Option<SimilarTracks>,
}

#[derive(Debug, Deserialize)]
struct SimilarTracks {
    track: OneOrMany<SimilarTrack>,
}

#[derive(Debug, Deserialize)]
struct SimilarTrack {
    name: Option<String>,
    artist: Option<SimilarArtist>,
    url: Option<String>,
    mbid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SimilarArtist {
    name: Option<String>,
}
