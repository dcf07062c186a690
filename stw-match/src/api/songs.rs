//! Song endpoints
//!
//! - `POST /songs/archetypes`: song → detected music genre → archetypes
//! - `GET /songs/similar?song=&limit=`: similar-songs cascade

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::{bounded_count, required_text, SessionId};
use crate::error::ApiResult;
use crate::services::{ProviderAttempt, SongArchetypes};
use crate::types::TrackSummary;
use crate::AppState;

const DEFAULT_LIMIT: usize = 5;
const MAX_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct SongRequest {
    pub song: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SimilarSongsQuery {
    pub song: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SimilarSongsResponse {
    pub source: Option<&'static str>,
    pub items: Vec<TrackSummary>,
    pub attempts: Vec<ProviderAttempt>,
}

/// POST /songs/archetypes
pub async fn song_archetypes(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    payload: Result<Json<SongRequest>, JsonRejection>,
) -> ApiResult<Json<SongArchetypes>> {
    let Json(request) = payload?;
    let song = required_text(request.song.as_deref(), "song")?;
    let ctx = state.context(session_id, None);

    Ok(Json(state.songs.archetypes_for_song(&ctx, song).await))
}

/// GET /songs/similar
pub async fn similar_songs(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    query: Result<Query<SimilarSongsQuery>, QueryRejection>,
) -> ApiResult<Json<SimilarSongsResponse>> {
    let Query(query) = query?;
    let song = required_text(query.song.as_deref(), "song")?;
    let limit = bounded_count(query.limit, DEFAULT_LIMIT, MAX_LIMIT, "limit")?;
    let ctx = state.context(session_id, None);

    let outcome = state.songs.similar_songs(&ctx, song, limit).await;
    Ok(Json(SimilarSongsResponse {
        source: outcome.source,
        items: outcome.items,
        attempts: outcome.attempts,
    }))
}

/// Build song routes
pub fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/songs/archetypes", post(song_archetypes))
        .route("/songs/similar", get(similar_songs))
}
