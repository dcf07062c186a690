//! External provider adapters
//!
//! Each client wraps one third-party API, normalizes its payload into the
//! shapes in [`crate::types`] and reports failures as
//! [`ProviderError`](crate::types::ProviderError). Clients share one
//! `reqwest::Client` built by [`http::build_http_client`].

pub mod http;
pub mod lastfm_client;
pub mod pexels_client;
pub mod pixabay_client;
pub mod qloo_client;
pub mod spotify_client;
pub mod tmdb_client;
pub mod unsplash_client;

pub use http::build_http_client;
pub use lastfm_client::LastFmClient;
pub use pexels_client::PexelsClient;
pub use pixabay_client::PixabayClient;
pub use qloo_client::QlooClient;
pub use spotify_client::SpotifyClient;
pub use tmdb_client::TmdbClient;
pub use unsplash_client::UnsplashClient;
