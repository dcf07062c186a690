//! Core Types and Trait Definitions for stw-match
//!
//! Defines the request context, the normalized provider result shapes and the
//! trait seams every external provider adapter implements:
//! - [`Provider`]: one step of a fallback cascade
//! - [`MovieMetadata`]: title → genre ids (resolver movie path)
//! - [`MovieCatalog`]: popular titles per genre, streaming offers
//! - [`MusicGenreSource`]: song → artist genres
//! - [`TrackLookup`]: free-text track lookup used for enrichment

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Request Context
// ============================================================================

/// Request-scoped context passed into the resolver, cascades and services
///
/// Replaces any notion of a "current selection": everything a lookup needs
/// beyond its direct arguments travels here.
#[derive(Debug, Clone)]
pub struct MatchContext {
    /// Caller session (from `x-session-id` or freshly generated)
    pub session_id: Uuid,
    /// ISO 3166-1 country used for regional lookups
    pub country_code: String,
}

impl MatchContext {
    pub fn new(session_id: Uuid, country_code: impl Into<String>) -> Self {
        Self {
            session_id,
            country_code: country_code.into().to_uppercase(),
        }
    }

    /// Context with a fresh session id
    pub fn detached(country_code: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4(), country_code)
    }
}

// ============================================================================
// Resolver Input / Output
// ============================================================================

/// A single media signal handed to the archetype resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaInput {
    /// Free-text movie title (needs one metadata lookup)
    Movie(String),
    /// Movie genre from the catalog vocabulary
    Genre(String),
    /// Music genre, case-insensitive
    Music(String),
}

impl MediaInput {
    pub fn kind(&self) -> InputKind {
        match self {
            MediaInput::Movie(_) => InputKind::Movie,
            MediaInput::Genre(_) => InputKind::Genre,
            MediaInput::Music(_) => InputKind::Music,
        }
    }
}

/// Discriminant of [`MediaInput`] for responses and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Movie,
    Genre,
    Music,
}

/// Deduplicated archetype labels; ordering carries no meaning
pub type ArchetypeSet = BTreeSet<String>;

// ============================================================================
// Normalized Provider Results
// ============================================================================

/// Movie record normalized from Qloo or TMDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub poster_url: Option<String>,
    pub overview: String,
}

impl MovieSummary {
    /// Record carrying only a name (Qloo recommendations)
    pub fn named(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            external_id: None,
            poster_url: None,
            overview: String::new(),
        }
    }
}

/// Track record normalized from Last.fm or Spotify
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub title: String,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub url: Option<String>,
    pub album_image_url: Option<String>,
    pub preview_url: Option<String>,
}

/// Image record normalized from Unsplash, Pexels or Pixabay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    pub thumbnail_url: String,
    pub full_url: String,
}

/// A streaming service carrying a title in a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingOffer {
    pub provider_name: String,
    pub logo_url: Option<String>,
}

/// Streaming availability for one title in one region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamingAvailability {
    pub offers: Vec<StreamingOffer>,
    /// Generic landing page for the title in that region
    pub link: Option<String>,
}

/// Artist genres for the best match of a song query
#[derive(Debug, Clone, PartialEq)]
pub struct SongGenres {
    /// "Title - Artist" of the matched track
    pub track_label: String,
    pub genres: Vec<String>,
}

// ============================================================================
// Provider Errors
// ============================================================================

/// Failure of a single provider call
///
/// Every transport, status or parse failure at the adapter boundary becomes
/// one of these. Cascades absorb them; nothing above the cascade sees them.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// API key or client credentials missing
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Transport failure (DNS, connect, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("API returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Body could not be decoded into the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

// ============================================================================
// Provider Traits
// ============================================================================

/// One step of a fallback cascade
///
/// Implementations perform their request(s), normalize the upstream payload
/// into `T` and return at most `count` items.
///
/// # Example
/// ```rust,ignore
/// pub struct PexelsClient { /* ... */ }
///
/// #[async_trait::async_trait]
/// impl Provider<ImageResult> for PexelsClient {
///     fn name(&self) -> &'static str { "Pexels" }
///
///     async fn fetch(&self, ctx: &MatchContext, query: &str, count: usize)
///         -> Result<Vec<ImageResult>, ProviderError> {
///         self.search_photos(query, count).await
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait Provider<T>: Send + Sync {
    /// Provider name for provenance and logs
    fn name(&self) -> &'static str;

    /// Query the provider
    ///
    /// `Ok(vec![])` and `Err(_)` are both "nothing from this provider" to
    /// the cascade; the distinction only matters for diagnostics.
    async fn fetch(
        &self,
        ctx: &MatchContext,
        query: &str,
        count: usize,
    ) -> Result<Vec<T>, ProviderError>;
}

/// Title search used by the resolver movie path
#[async_trait::async_trait]
pub trait MovieMetadata: Send + Sync {
    /// Genre ids of the first title matching `title`
    ///
    /// `Ok(vec![])` when nothing matches.
    async fn genre_ids_for_title(
        &self,
        ctx: &MatchContext,
        title: &str,
    ) -> Result<Vec<u32>, ProviderError>;
}

/// Browsing lookups around a movie genre
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Popular titles for a genre id in the context's region
    async fn popular_by_genre(
        &self,
        ctx: &MatchContext,
        genre_id: u32,
    ) -> Result<Vec<MovieSummary>, ProviderError>;

    /// Streaming offers for a title in the context's region
    async fn streaming_availability(
        &self,
        ctx: &MatchContext,
        movie_id: u64,
    ) -> Result<StreamingAvailability, ProviderError>;
}

/// Song → artist genres
#[async_trait::async_trait]
pub trait MusicGenreSource: Send + Sync {
    /// `Ok(None)` when no track matches the query
    async fn song_genres(
        &self,
        ctx: &MatchContext,
        song: &str,
    ) -> Result<Option<SongGenres>, ProviderError>;
}

/// Free-text track lookup
#[async_trait::async_trait]
pub trait TrackLookup: Send + Sync {
    async fn lookup_track(
        &self,
        ctx: &MatchContext,
        query: &str,
    ) -> Result<Option<TrackSummary>, ProviderError>;
}
