//! HTTP API handlers for stw-match
//!
//! JSON over HTTP. Every handler builds a [`MatchContext`](crate::types::MatchContext)
//! from the optional `x-session-id` header and the request's country, then
//! awaits its lookups one after another.

pub mod archetypes;
pub mod health;
pub mod movies;
pub mod songs;
pub mod styles;

pub use archetypes::archetype_routes;
pub use health::health_routes;
pub use movies::movie_routes;
pub use songs::song_routes;
pub use styles::style_routes;

use crate::error::{ApiError, ApiResult};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use tracing::debug;
use uuid::Uuid;

/// Header carrying the caller's session id
pub const SESSION_HEADER: &str = "x-session-id";

/// Caller session from `x-session-id`, or a fresh one
///
/// A header that is not a UUID is ignored rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for SessionId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok());

        match header.map(|v| Uuid::parse_str(v.trim())) {
            Some(Ok(id)) => Ok(SessionId(id)),
            Some(Err(_)) => {
                debug!("Ignoring malformed {} header", SESSION_HEADER);
                Ok(SessionId(Uuid::new_v4()))
            }
            None => Ok(SessionId(Uuid::new_v4())),
        }
    }
}

/// Non-blank text parameter
pub(crate) fn required_text<'a>(value: Option<&'a str>, field: &str) -> ApiResult<&'a str> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ApiError::BadRequest(format!("'{}' is required", field))),
    }
}

/// Result count within `1..=max`, `default` when absent
pub(crate) fn bounded_count(
    value: Option<usize>,
    default: usize,
    max: usize,
    field: &str,
) -> ApiResult<usize> {
    match value {
        None => Ok(default),
        Some(n) if (1..=max).contains(&n) => Ok(n),
        Some(n) => Err(ApiError::BadRequest(format!(
            "'{}' must be between 1 and {} (got {})",
            field, max, n
        ))),
    }
}

/// Two-letter ISO 3166-1 country code, if given
pub(crate) fn country_param(value: Option<&str>) -> ApiResult<Option<&str>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) => {
            Ok(Some(code))
        }
        Some(code) => Err(ApiError::BadRequest(format!(
            "'country' must be a two-letter country code (got {:?})",
            code
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert_eq!(required_text(Some("  Heat "), "title").unwrap(), "Heat");
        assert!(required_text(Some("   "), "title").is_err());
        assert!(required_text(None, "title").is_err());
    }

    #[test]
    fn test_bounded_count() {
        assert_eq!(bounded_count(None, 5, 20, "limit").unwrap(), 5);
        assert_eq!(bounded_count(Some(20), 5, 20, "limit").unwrap(), 20);
        assert!(bounded_count(Some(0), 5, 20, "limit").is_err());
        assert!(bounded_count(Some(21), 5, 20, "limit").is_err());
    }

    #[test]
    fn test_country_param() {
        assert_eq!(country_param(Some("gb")).unwrap(), Some("gb"));
        assert_eq!(country_param(Some("")).unwrap(), None);
        assert_eq!(country_param(None).unwrap(), None);
        assert!(country_param(Some("USA")).is_err());
        assert!(country_param(Some("1A")).is_err());
    }
}
