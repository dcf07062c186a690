//! Song Matcher
//!
//! Two song-driven lookups:
//! - style from a song: artist genres → first catalog music genre found as a
//!   substring → resolver music path
//! - similar songs: similar-songs cascade, Last.fm hits enriched with
//!   Spotify artwork and links one by one

use crate::catalog::StyleCatalog;
use crate::services::{ArchetypeResolver, CascadeOutcome, ProviderCascade};
use crate::types::{ArchetypeSet, MatchContext, MusicGenreSource, TrackLookup, TrackSummary};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Provider name whose results get enriched
const ENRICHED_SOURCE: &str = "Last.fm";

/// Style detected from a song
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongArchetypes {
    /// "Title - Artist" of the matched track
    pub matched_track: Option<String>,
    /// Catalog music genre the artist genres matched
    pub detected_genre: Option<String>,
    pub archetypes: ArchetypeSet,
}

impl SongArchetypes {
    fn undetected(matched_track: Option<String>) -> Self {
        Self {
            matched_track,
            detected_genre: None,
            archetypes: ArchetypeSet::new(),
        }
    }
}

pub struct SongMatcher {
    resolver: Arc<ArchetypeResolver>,
    genres: Arc<dyn MusicGenreSource>,
    similar: Arc<ProviderCascade<TrackSummary>>,
    tracks: Arc<dyn TrackLookup>,
}

impl SongMatcher {
    pub fn new(
        resolver: Arc<ArchetypeResolver>,
        genres: Arc<dyn MusicGenreSource>,
        similar: Arc<ProviderCascade<TrackSummary>>,
        tracks: Arc<dyn TrackLookup>,
    ) -> Self {
        Self {
            resolver,
            genres,
            similar,
            tracks,
        }
    }

    /// Detect a music genre for `song` and resolve its archetypes
    pub async fn archetypes_for_song(&self, ctx: &MatchContext, song: &str) -> SongArchetypes {
        let song = song.trim();
        if song.is_empty() {
            return SongArchetypes::undetected(None);
        }

        let song_genres = match self.genres.song_genres(ctx, song).await {
            Ok(Some(found)) => found,
            Ok(None) => {
                debug!(session_id = %ctx.session_id, song = %song, "No track matched song");
                return SongArchetypes::undetected(None);
            }
            Err(e) => {
                warn!(
                    session_id = %ctx.session_id,
                    song = %song,
                    error = %e,
                    "Song genre lookup failed, treating as undetected"
                );
                return SongArchetypes::undetected(None);
            }
        };

        let Some(genre) = detect_music_genre(self.resolver.catalog(), &song_genres.genres) else {
            info!(
                session_id = %ctx.session_id,
                track = %song_genres.track_label,
                artist_genres = ?song_genres.genres,
                "No known music genre in artist genres"
            );
            return SongArchetypes::undetected(Some(song_genres.track_label));
        };

        let archetypes = self.resolver.resolve_music(&genre);
        info!(
            session_id = %ctx.session_id,
            track = %song_genres.track_label,
            genre = %genre,
            archetypes = archetypes.len(),
            "Song style detected"
        );

        SongArchetypes {
            matched_track: Some(song_genres.track_label),
            detected_genre: Some(genre),
            archetypes,
        }
    }

    /// Similar songs through the cascade
    pub async fn similar_songs(
        &self,
        ctx: &MatchContext,
        song: &str,
        count: usize,
    ) -> CascadeOutcome<TrackSummary> {
        let song = song.trim();
        if song.is_empty() {
            return CascadeOutcome {
                items: Vec::new(),
                source: None,
                attempts: Vec::new(),
            };
        }

        let mut outcome = self.similar.run(ctx, song, count).await;
        if outcome.source == Some(ENRICHED_SOURCE) {
            let mut enriched = Vec::with_capacity(outcome.items.len());
            for track in outcome.items {
                enriched.push(self.enrich(ctx, track).await);
            }
            outcome.items = enriched;
        }
        outcome
    }

    /// Replace a track with its Spotify match; keep it on a miss
    async fn enrich(&self, ctx: &MatchContext, track: TrackSummary) -> TrackSummary {
        let query = format!("{} {}", track.title, track.artist);
        match self.tracks.lookup_track(ctx, &query).await {
            Ok(Some(found)) => found,
            Ok(None) => track,
            Err(e) => {
                debug!(
                    session_id = %ctx.session_id,
                    query = %query,
                    error = %e,
                    "Track enrichment failed, keeping original"
                );
                track
            }
        }
    }
}

/// First catalog music genre occurring in any artist genre
pub fn detect_music_genre(catalog: &StyleCatalog, artist_genres: &[String]) -> Option<String> {
    let artist_genres: Vec<String> = artist_genres.iter().map(|g| g.to_lowercase()).collect();
    catalog
        .music_genres()
        .find(|key| artist_genres.iter().any(|g| g.contains(key)))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::AttemptOutcome;
    use crate::types::{MovieMetadata, Provider, ProviderError, SongGenres};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NoMetadata;

    #[async_trait::async_trait]
    impl MovieMetadata for NoMetadata {
        async fn genre_ids_for_title(
            &self,
            _ctx: &MatchContext,
            _title: &str,
        ) -> Result<Vec<u32>, ProviderError> {
            Ok(Vec::new())
        }
    }

    struct StubGenres(Option<Vec<&'static str>>);

    #[async_trait::async_trait]
    impl MusicGenreSource for StubGenres {
        async fn song_genres(
            &self,
            _ctx: &MatchContext,
            song: &str,
        ) -> Result<Option<SongGenres>, ProviderError> {
            Ok(self.0.as_ref().map(|genres| SongGenres {
                track_label: format!("{} - Someone", song),
                genres: genres.iter().map(|g| g.to_string()).collect(),
            }))
        }
    }

    struct StubTracks {
        name: &'static str,
        items: Vec<TrackSummary>,
    }

    #[async_trait::async_trait]
    impl Provider<TrackSummary> for StubTracks {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch(
            &self,
            _ctx: &MatchContext,
            _query: &str,
            count: usize,
        ) -> Result<Vec<TrackSummary>, ProviderError> {
            Ok(self.items.iter().take(count).cloned().collect())
        }
    }

    /// Finds every track except "Obscure"
    struct StubLookup {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl TrackLookup for StubLookup {
        async fn lookup_track(
            &self,
            _ctx: &MatchContext,
            query: &str,
        ) -> Result<Option<TrackSummary>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if query.starts_with("Obscure") {
                return Ok(None);
            }
            let mut found = track(query, "Spotify Artist");
            found.album_image_url = Some("https://i.scdn.co/cover".to_string());
            Ok(Some(found))
        }
    }

    fn track(title: &str, artist: &str) -> TrackSummary {
        TrackSummary {
            title: title.to_string(),
            artist: artist.to_string(),
            external_id: None,
            url: None,
            album_image_url: None,
            preview_url: None,
        }
    }

    fn resolver() -> Arc<ArchetypeResolver> {
        Arc::new(ArchetypeResolver::new(StyleCatalog::builtin(), Arc::new(NoMetadata)))
    }

    fn matcher(
        genres: StubGenres,
        similar: StubTracks,
        lookup: Arc<StubLookup>,
    ) -> SongMatcher {
        let cascade = ProviderCascade::new(
            "similar songs",
            vec![Arc::new(similar) as Arc<dyn Provider<TrackSummary>>],
        );
        SongMatcher::new(resolver(), Arc::new(genres), Arc::new(cascade), lookup)
    }

    fn lookup() -> Arc<StubLookup> {
        Arc::new(StubLookup {
            calls: AtomicUsize::new(0),
        })
    }

    fn empty_tracks() -> StubTracks {
        StubTracks {
            name: "Last.fm",
            items: Vec::new(),
        }
    }

    #[test]
    fn test_detect_genre_substring_in_catalog_order() {
        let catalog = StyleCatalog::builtin();
        let genres = vec!["Modern Rock".to_string(), "dance pop".to_string()];
        assert_eq!(detect_music_genre(&catalog, &genres).as_deref(), Some("pop"));
    }

    #[test]
    fn test_detect_genre_none() {
        let catalog = StyleCatalog::builtin();
        assert!(detect_music_genre(&catalog, &["polka-free".to_string()]).is_none());
        assert!(detect_music_genre(&catalog, &[]).is_none());
    }

    #[tokio::test]
    async fn test_song_archetypes_detected() {
        let matcher = matcher(StubGenres(Some(vec!["smooth jazz"])), empty_tracks(), lookup());
        let result = matcher
            .archetypes_for_song(&MatchContext::detached("US"), "Take Five")
            .await;

        assert_eq!(result.detected_genre.as_deref(), Some("jazz"));
        assert_eq!(result.matched_track.as_deref(), Some("Take Five - Someone"));
        let expected: ArchetypeSet = ["classic", "preppy", "minimalist", "retro", "vintage", "90s-core"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(result.archetypes, expected);
    }

    #[tokio::test]
    async fn test_song_archetypes_undetected() {
        let matcher = matcher(StubGenres(Some(vec!["sea shanty"])), empty_tracks(), lookup());
        let result = matcher
            .archetypes_for_song(&MatchContext::detached("US"), "Wellerman")
            .await;
        assert!(result.detected_genre.is_none());
        assert!(result.archetypes.is_empty());
        assert!(result.matched_track.is_some());
    }

    #[tokio::test]
    async fn test_song_not_found() {
        let matcher = matcher(StubGenres(None), empty_tracks(), lookup());
        let result = matcher
            .archetypes_for_song(&MatchContext::detached("US"), "zzzz")
            .await;
        assert_eq!(result, SongArchetypes::undetected(None));
    }

    #[tokio::test]
    async fn test_similar_songs_enriched_from_lastfm() {
        let similar = StubTracks {
            name: "Last.fm",
            items: vec![track("Karma Police", "Radiohead"), track("Obscure", "Nobody")],
        };
        let lookup = lookup();
        let matcher = matcher(StubGenres(None), similar, lookup.clone());

        let outcome = matcher
            .similar_songs(&MatchContext::detached("US"), "Creep", 5)
            .await;

        assert_eq!(outcome.source, Some("Last.fm"));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 2);
        assert_eq!(outcome.items[0].album_image_url.as_deref(), Some("https://i.scdn.co/cover"));
        assert_eq!(outcome.items[1], track("Obscure", "Nobody"), "miss keeps the original");
    }

    #[tokio::test]
    async fn test_similar_songs_from_spotify_not_enriched() {
        let similar = StubTracks {
            name: "Spotify",
            items: vec![track("Creep", "Radiohead")],
        };
        let lookup = lookup();
        let matcher = matcher(StubGenres(None), similar, lookup.clone());

        let outcome = matcher
            .similar_songs(&MatchContext::detached("US"), "Creep", 5)
            .await;

        assert_eq!(outcome.source, Some("Spotify"));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_similar_songs_exhausted() {
        let matcher = matcher(StubGenres(None), empty_tracks(), lookup());
        let outcome = matcher
            .similar_songs(&MatchContext::detached("US"), "Creep", 5)
            .await;
        assert!(outcome.is_exhausted());
        assert_eq!(outcome.attempts[0].outcome, AttemptOutcome::Empty);
    }
}
