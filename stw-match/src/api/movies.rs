//! Movie endpoints
//!
//! - `GET /movies/similar?title=&limit=`: similar-movies cascade
//! - `GET /movies/by-genre/:genre?country=`: popular titles for a genre
//! - `GET /movies/:id/providers?country=`: streaming offers
//!
//! Provider failures are logged and answered with empty results.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::{bounded_count, country_param, required_text, SessionId};
use crate::error::{ApiError, ApiResult};
use crate::services::ProviderAttempt;
use crate::types::{MovieSummary, StreamingAvailability};
use crate::AppState;

const DEFAULT_LIMIT: usize = 5;
const MAX_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    pub title: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct CountryQuery {
    pub country: Option<String>,
}

/// Cascade answer with provenance
#[derive(Debug, Serialize)]
pub struct SimilarMoviesResponse {
    /// Provider that answered, `null` when every provider came back empty
    pub source: Option<&'static str>,
    pub items: Vec<MovieSummary>,
    pub attempts: Vec<ProviderAttempt>,
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub items: Vec<MovieSummary>,
}

/// GET /movies/similar
pub async fn similar_movies(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    query: Result<Query<SimilarQuery>, QueryRejection>,
) -> ApiResult<Json<SimilarMoviesResponse>> {
    let Query(query) = query?;
    let title = required_text(query.title.as_deref(), "title")?;
    let limit = bounded_count(query.limit, DEFAULT_LIMIT, MAX_LIMIT, "limit")?;
    let ctx = state.context(session_id, None);

    let outcome = state.similar_movies.run(&ctx, title, limit).await;
    Ok(Json(SimilarMoviesResponse {
        source: outcome.source,
        items: outcome.items,
        attempts: outcome.attempts,
    }))
}

/// GET /movies/by-genre/:genre
///
/// A genre without a TMDB id yields no titles.
pub async fn movies_by_genre(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Path(genre): Path<String>,
    query: Result<Query<CountryQuery>, QueryRejection>,
) -> ApiResult<Json<MoviesResponse>> {
    let Query(query) = query?;
    let country = country_param(query.country.as_deref())?;
    let ctx = state.context(session_id, country);

    let Some(genre_id) = state.catalog.genre_id(&genre) else {
        return Ok(Json(MoviesResponse { items: Vec::new() }));
    };

    let items = match state.movie_catalog.popular_by_genre(&ctx, genre_id).await {
        Ok(items) => items,
        Err(e) => {
            warn!(
                session_id = %ctx.session_id,
                genre = %genre,
                error = %e,
                "Popular-by-genre lookup failed"
            );
            Vec::new()
        }
    };

    Ok(Json(MoviesResponse { items }))
}

/// GET /movies/:id/providers
pub async fn streaming_providers(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Path(movie_id): Path<String>,
    query: Result<Query<CountryQuery>, QueryRejection>,
) -> ApiResult<Json<StreamingAvailability>> {
    let movie_id: u64 = movie_id
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("movie id must be numeric (got {:?})", movie_id)))?;
    let Query(query) = query?;
    let country = country_param(query.country.as_deref())?;
    let ctx = state.context(session_id, country);

    let availability = match state.movie_catalog.streaming_availability(&ctx, movie_id).await {
        Ok(availability) => availability,
        Err(e) => {
            warn!(
                session_id = %ctx.session_id,
                movie_id = movie_id,
                country = %ctx.country_code,
                error = %e,
                "Streaming availability lookup failed"
            );
            StreamingAvailability::default()
        }
    };

    Ok(Json(availability))
}

/// Build movie routes
pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/movies/similar", get(similar_movies))
        .route("/movies/by-genre/:genre", get(movies_by_genre))
        .route("/movies/:id/providers", get(streaming_providers))
}
