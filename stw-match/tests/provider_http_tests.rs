//! Provider adapters against local stub servers
//!
//! Each test starts an axum app on 127.0.0.1:0 that imitates the upstream
//! API, points the real client at it with `with_base_url` and checks the
//! request shape, normalization and cascade behavior end to end.

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use stw_match::providers::{
    LastFmClient, PexelsClient, PixabayClient, QlooClient, SpotifyClient, TmdbClient,
    UnsplashClient,
};
use stw_match::services::ProviderCascade;
use stw_match::types::{
    ImageResult, MatchContext, MovieCatalog, MovieMetadata, MusicGenreSource, Provider,
    ProviderError, TrackLookup,
};

/// Serve `app` on an ephemeral port, returning its base URL
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn http() -> reqwest::Client {
    reqwest::Client::new()
}

fn ctx() -> MatchContext {
    MatchContext::detached("US")
}

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

/// Unsplash answering 500, Pexels answering one photo, Pixabay counting hits
async fn image_stubs(unsplash_status: StatusCode) -> (String, String, String, Arc<AtomicUsize>) {
    let unsplash = serve(Router::new().route(
        "/search/photos",
        get(move || async move {
            if unsplash_status.is_success() {
                (unsplash_status, Json(json!({ "total": 0, "results": [] })))
            } else {
                (unsplash_status, Json(json!({ "errors": ["Internal"] })))
            }
        }),
    ))
    .await;

    let pexels = serve(Router::new().route(
        "/v1/search",
        get(|headers: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
            if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("pexels-key") {
                return (StatusCode::UNAUTHORIZED, Json(json!({}))).into_response();
            }
            assert_eq!(q.get("query").map(String::as_str), Some("grunge style clothing"));
            Json(json!({
                "page": 1,
                "photos": [ { "id": 1, "src": { "medium": "url1", "large": "url1-large" } } ]
            }))
            .into_response()
        }),
    ))
    .await;

    let pixabay_hits = counter();
    let hits = pixabay_hits.clone();
    let pixabay = serve(Router::new().route(
        "/api/",
        get(move || {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(json!({ "hits": [ { "webformatURL": "url2" } ] }))
            }
        }),
    ))
    .await;

    (unsplash, pexels, pixabay, pixabay_hits)
}

fn image_cascade(unsplash: &str, pexels: &str, pixabay: &str) -> ProviderCascade<ImageResult> {
    let providers: Vec<Arc<dyn Provider<ImageResult>>> = vec![
        Arc::new(
            UnsplashClient::new(http(), "unsplash-key")
                .with_base_url(unsplash)
                .with_variety(false),
        ),
        Arc::new(PexelsClient::new(http(), "pexels-key").with_base_url(pexels)),
        Arc::new(PixabayClient::new(http(), "pixabay-key").with_base_url(pixabay)),
    ];
    ProviderCascade::new("images", providers)
}

#[tokio::test]
async fn test_image_cascade_skips_failed_unsplash() {
    let (unsplash, pexels, pixabay, pixabay_hits) =
        image_stubs(StatusCode::INTERNAL_SERVER_ERROR).await;

    let outcome = image_cascade(&unsplash, &pexels, &pixabay)
        .run(&ctx(), "grunge style clothing", 1)
        .await;

    assert_eq!(outcome.source, Some("Pexels"));
    assert_eq!(
        outcome.items,
        vec![ImageResult {
            thumbnail_url: "url1".to_string(),
            full_url: "url1-large".to_string(),
        }]
    );
    assert_eq!(pixabay_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_image_cascade_skips_empty_unsplash() {
    let (unsplash, pexels, pixabay, pixabay_hits) = image_stubs(StatusCode::OK).await;

    let outcome = image_cascade(&unsplash, &pexels, &pixabay)
        .run(&ctx(), "grunge style clothing", 1)
        .await;

    assert_eq!(outcome.source, Some("Pexels"));
    assert_eq!(outcome.items[0].thumbnail_url, "url1");
    assert_eq!(pixabay_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unconfigured_provider_makes_no_request() {
    let (_, _, pixabay, pixabay_hits) = image_stubs(StatusCode::OK).await;
    let client = PixabayClient::new(http(), "").with_base_url(pixabay);

    let result = client.fetch(&ctx(), "boho fashion woman", 3).await;
    assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    assert_eq!(pixabay_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_pixabay_widens_small_pages() {
    let seen_per_page = Arc::new(std::sync::Mutex::new(None::<String>));
    let seen = seen_per_page.clone();
    let base = serve(Router::new().route(
        "/api/",
        get(move |Query(q): Query<HashMap<String, String>>| {
            let seen = seen.clone();
            async move {
                *seen.lock().unwrap() = q.get("per_page").cloned();
                Json(json!({ "hits": [
                    { "webformatURL": "a" }, { "webformatURL": "b" }, { "webformatURL": "c" }
                ] }))
            }
        }),
    ))
    .await;

    let client = PixabayClient::new(http(), "pixabay-key").with_base_url(base);
    let images = client.fetch(&ctx(), "punk outfit fashion", 1).await.unwrap();

    assert_eq!(images.len(), 1);
    assert_eq!(seen_per_page.lock().unwrap().as_deref(), Some("3"));
}

#[tokio::test]
async fn test_tmdb_search_recommendations_and_providers() {
    let base = serve(
        Router::new()
            .route(
                "/search/movie",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    assert_eq!(q.get("api_key").map(String::as_str), Some("tmdb-key"));
                    Json(json!({ "results": [
                        { "id": 8363, "title": "Superbad", "genre_ids": [35], "poster_path": "/sb.jpg" }
                    ] }))
                }),
            )
            .route(
                "/movie/8363/recommendations",
                get(|| async {
                    Json(json!({ "results": [
                        { "id": 10189, "title": "Pineapple Express", "overview": "Stoners.", "poster_path": "/pe.jpg" },
                        { "id": 1, "overview": "" }
                    ] }))
                }),
            )
            .route(
                "/movie/8363/watch/providers",
                get(|| async {
                    Json(json!({ "id": 8363, "results": {
                        "GB": {
                            "link": "https://www.themoviedb.org/movie/8363/watch?locale=GB",
                            "flatrate": [ { "provider_name": "Netflix", "logo_path": "/nf.png" } ]
                        }
                    } }))
                }),
            ),
    )
    .await;

    let client = TmdbClient::new(http(), "tmdb-key").with_base_url(base);

    assert_eq!(client.genre_ids_for_title(&ctx(), "superbad").await.unwrap(), vec![35]);

    let similar = client.fetch(&ctx(), "superbad", 5).await.unwrap();
    assert_eq!(similar.len(), 2);
    assert_eq!(similar[0].title, "Pineapple Express");
    assert_eq!(
        similar[0].poster_url.as_deref(),
        Some("https://image.tmdb.org/t/p/w200/pe.jpg")
    );
    assert_eq!(similar[1].title, "Untitled");

    let gb = client
        .streaming_availability(&MatchContext::detached("gb"), 8363)
        .await
        .unwrap();
    assert_eq!(gb.offers[0].provider_name, "Netflix");
    assert_eq!(
        gb.offers[0].logo_url.as_deref(),
        Some("https://image.tmdb.org/t/p/w45/nf.png")
    );

    let us = client.streaming_availability(&ctx(), 8363).await.unwrap();
    assert!(us.offers.is_empty());
}

#[tokio::test]
async fn test_tmdb_status_error_is_typed() {
    let base = serve(Router::new().route(
        "/search/movie",
        get(|| async { (StatusCode::UNAUTHORIZED, "Invalid API key") }),
    ))
    .await;

    let client = TmdbClient::new(http(), "bad-key").with_base_url(base);
    match client.genre_ids_for_title(&ctx(), "Heat").await {
        Err(ProviderError::Status { status, message }) => {
            assert_eq!(status, 401);
            assert!(message.contains("Invalid API key"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_tmdb_garbage_body_is_parse_error() {
    let base = serve(Router::new().route("/search/movie", get(|| async { "<html>" })))
        .await;

    let client = TmdbClient::new(http(), "tmdb-key").with_base_url(base);
    let result = client.genre_ids_for_title(&ctx(), "Heat").await;
    assert!(matches!(result, Err(ProviderError::Parse(_))));
}

#[tokio::test]
async fn test_qloo_search_then_recommendations() {
    let base = serve(
        Router::new()
            .route(
                "/search",
                get(|headers: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
                    assert_eq!(headers.get("x-api-key").unwrap(), "qloo-key");
                    assert_eq!(q.get("query").map(String::as_str), Some("The Matrix"));
                    assert_eq!(q.get("types").map(String::as_str), Some("urn:entity:movie"));
                    Json(json!({ "results": [ { "id": "urn:qloo:matrix" } ] }))
                }),
            )
            .route(
                "/v1/insights/recommendations",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["entities"], json!(["urn:qloo:matrix"]));
                    assert_eq!(body["type"], "movie");
                    Json(json!({ "results": [ { "name": "Dark City" }, { "name": "Inception" } ] }))
                }),
            ),
    )
    .await;

    let client = QlooClient::new(http(), "qloo-key").with_base_url(base);
    let movies = client.fetch(&ctx(), "the matrix", 1).await.unwrap();

    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "dark city");
}

#[tokio::test]
async fn test_lastfm_single_object_shapes() {
    let base = serve(Router::new().route(
        "/",
        get(|Query(q): Query<HashMap<String, String>>| async move {
            match q.get("method").map(String::as_str) {
                Some("track.search") => Json(json!({
                    "results": { "trackmatches": { "track": { "name": "Creep", "artist": "Radiohead" } } }
                })),
                Some("track.getsimilar") => {
                    assert_eq!(q.get("artist").map(String::as_str), Some("Radiohead"));
                    Json(json!({
                        "similartracks": { "track": { "name": "Karma Police", "artist": { "name": "Radiohead" } } }
                    }))
                }
                _ => Json(json!({ "error": 3, "message": "Invalid Method" })),
            }
        }),
    ))
    .await;

    let client = LastFmClient::new(http(), "lastfm-key").with_base_url(base);
    let tracks = client.fetch(&ctx(), "creep", 5).await.unwrap();

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "Karma Police");
    assert_eq!(tracks[0].artist, "Radiohead");
}

#[tokio::test]
async fn test_spotify_token_cached_across_lookups() {
    let token_requests = counter();
    let tokens = token_requests.clone();
    let accounts = serve(Router::new().route(
        "/api/token",
        post(move |headers: HeaderMap, body: String| {
            let tokens = tokens.clone();
            async move {
                tokens.fetch_add(1, Ordering::SeqCst);
                assert!(headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|v| v.starts_with("Basic ")));
                assert_eq!(body, "grant_type=client_credentials");
                Json(json!({ "access_token": "tok", "token_type": "Bearer", "expires_in": 3600 }))
            }
        }),
    ))
    .await;

    let api = serve(
        Router::new()
            .route(
                "/search",
                get(|headers: HeaderMap| async move {
                    if headers.get("authorization").unwrap() != "Bearer tok" {
                        return (StatusCode::UNAUTHORIZED, Json(json!({}))).into_response();
                    }
                    Json(json!({ "tracks": { "items": [ {
                        "id": "t1",
                        "name": "Smells Like Teen Spirit",
                        "artists": [ { "id": "a1", "name": "Nirvana" } ],
                        "album": { "images": [ { "url": "https://i.scdn.co/nevermind" } ] },
                        "preview_url": null,
                        "external_urls": { "spotify": "https://open.spotify.com/track/t1" }
                    } ] } }))
                    .into_response()
                }),
            )
            .route(
                "/artists/a1",
                get(|| async { Json(json!({ "id": "a1", "genres": ["grunge", "permanent wave"] })) }),
            ),
    )
    .await;

    let client = SpotifyClient::new(http(), "client-id", "client-secret").with_base_urls(api, accounts);

    let found = client
        .lookup_track(&ctx(), "Smells Like Teen Spirit Nirvana")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.album_image_url.as_deref(), Some("https://i.scdn.co/nevermind"));

    let genres = client
        .song_genres(&ctx(), "Smells Like Teen Spirit")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(genres.track_label, "Smells Like Teen Spirit - Nirvana");
    assert_eq!(genres.genres, vec!["grunge", "permanent wave"]);

    assert_eq!(token_requests.load(Ordering::SeqCst), 1, "token reused");
}
