//! Provider credential resolution for stw-match
//!
//! Every credential resolves with ENV → TOML priority through
//! [`stw_common::config::resolve_secret`]. A missing credential is not an
//! error here: the matching client stays wired into its cascade and reports
//! "not configured" when called, so the cascade moves on.

use stw_common::config::{resolve_secret, TomlConfig};
use tracing::warn;

/// Resolved provider credentials (blank = not configured)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderKeys {
    pub qloo: String,
    pub tmdb: String,
    pub unsplash: String,
    pub pexels: String,
    pub pixabay: String,
    pub lastfm: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
}

impl ProviderKeys {
    /// Resolve all credentials from environment and TOML
    pub fn resolve(config: &TomlConfig) -> Self {
        let keys = &config.api_keys;
        let resolve = |name: &str, toml: &Option<String>| {
            resolve_secret(name, toml.as_deref()).unwrap_or_default()
        };

        let resolved = Self {
            qloo: resolve("qloo_api_key", &keys.qloo),
            tmdb: resolve("tmdb_api_key", &keys.tmdb),
            unsplash: resolve("unsplash_access_key", &keys.unsplash),
            pexels: resolve("pexels_api_key", &keys.pexels),
            pixabay: resolve("pixabay_api_key", &keys.pixabay),
            lastfm: resolve("lastfm_api_key", &keys.lastfm),
            spotify_client_id: resolve("spotify_client_id", &keys.spotify_client_id),
            spotify_client_secret: resolve("spotify_client_secret", &keys.spotify_client_secret),
        };

        let missing = resolved.missing();
        if !missing.is_empty() {
            warn!(
                "Providers without credentials (will be skipped): {}",
                missing.join(", ")
            );
        }
        resolved
    }

    /// Names of providers lacking credentials
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for (name, key) in [
            ("Qloo", &self.qloo),
            ("TMDB", &self.tmdb),
            ("Unsplash", &self.unsplash),
            ("Pexels", &self.pexels),
            ("Pixabay", &self.pixabay),
            ("Last.fm", &self.lastfm),
        ] {
            if key.is_empty() {
                missing.push(name);
            }
        }
        if self.spotify_client_id.is_empty() || self.spotify_client_secret.is_empty() {
            missing.push("Spotify");
        }
        missing
    }
}
