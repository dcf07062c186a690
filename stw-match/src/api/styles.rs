//! Lookbook endpoints
//!
//! - `GET /styles/:archetype?count=`: one archetype with several photos
//! - `POST /looks`: overview, one photo per archetype

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::{bounded_count, required_text, SessionId};
use crate::error::{ApiError, ApiResult};
use crate::services::StyleLook;
use crate::AppState;

const DEFAULT_COUNT: usize = 5;
const MAX_COUNT: usize = 30;
const MAX_OVERVIEW: usize = 20;

#[derive(Debug, Deserialize)]
pub struct StyleQuery {
    pub count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LooksRequest {
    #[serde(default)]
    pub archetypes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LooksResponse {
    pub looks: Vec<StyleLook>,
}

/// GET /styles/:archetype
pub async fn style_look(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Path(archetype): Path<String>,
    query: Result<Query<StyleQuery>, QueryRejection>,
) -> ApiResult<Json<StyleLook>> {
    let Query(query) = query?;
    let archetype = required_text(Some(archetype.as_str()), "archetype")?;
    let count = bounded_count(query.count, DEFAULT_COUNT, MAX_COUNT, "count")?;
    let ctx = state.context(session_id, None);

    Ok(Json(state.lookbook.look(&ctx, archetype, count).await))
}

/// POST /looks
pub async fn style_overview(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    payload: Result<Json<LooksRequest>, JsonRejection>,
) -> ApiResult<Json<LooksResponse>> {
    let Json(request) = payload?;
    if request.archetypes.len() > MAX_OVERVIEW {
        return Err(ApiError::BadRequest(format!(
            "at most {} archetypes per overview (got {})",
            MAX_OVERVIEW,
            request.archetypes.len()
        )));
    }
    let ctx = state.context(session_id, None);

    let looks = state.lookbook.overview(&ctx, &request.archetypes).await;
    Ok(Json(LooksResponse { looks }))
}

/// Build lookbook routes
pub fn style_routes() -> Router<AppState> {
    Router::new()
        .route("/styles/:archetype", get(style_look))
        .route("/looks", post(style_overview))
}
