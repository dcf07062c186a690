//! Archetype endpoints
//!
//! - `GET /genres`: movie genre vocabulary
//! - `POST /archetypes`: one media signal → archetype set

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::SessionId;
use crate::error::{ApiError, ApiResult};
use crate::types::{ArchetypeSet, InputKind, MediaInput};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct GenresResponse {
    pub genres: Vec<String>,
}

/// Exactly one field must be set
#[derive(Debug, Default, Deserialize)]
pub struct ArchetypeRequest {
    pub movie: Option<String>,
    pub genre: Option<String>,
    pub music: Option<String>,
}

impl ArchetypeRequest {
    fn into_input(self) -> ApiResult<MediaInput> {
        match (self.movie, self.genre, self.music) {
            (Some(movie), None, None) => Ok(MediaInput::Movie(movie)),
            (None, Some(genre), None) => Ok(MediaInput::Genre(genre)),
            (None, None, Some(music)) => Ok(MediaInput::Music(music)),
            (None, None, None) => Err(ApiError::BadRequest(
                "one of 'movie', 'genre' or 'music' is required".to_string(),
            )),
            _ => Err(ApiError::BadRequest(
                "only one of 'movie', 'genre' or 'music' may be given".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArchetypeResponse {
    pub input_kind: InputKind,
    pub archetypes: ArchetypeSet,
}

/// GET /genres
pub async fn list_genres(State(state): State<AppState>) -> Json<GenresResponse> {
    Json(GenresResponse {
        genres: state.catalog.genres().to_vec(),
    })
}

/// POST /archetypes
pub async fn resolve_archetypes(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    payload: Result<Json<ArchetypeRequest>, JsonRejection>,
) -> ApiResult<Json<ArchetypeResponse>> {
    let Json(request) = payload?;
    let input = request.into_input()?;
    let ctx = state.context(session_id, None);

    let archetypes = state.resolver.resolve(&ctx, &input).await;
    info!(
        session_id = %ctx.session_id,
        kind = ?input.kind(),
        archetypes = archetypes.len(),
        "Archetype request served"
    );

    Ok(Json(ArchetypeResponse {
        input_kind: input.kind(),
        archetypes,
    }))
}

/// Build archetype routes
pub fn archetype_routes() -> Router<AppState> {
    Router::new()
        .route("/genres", get(list_genres))
        .route("/archetypes", post(resolve_archetypes))
}
