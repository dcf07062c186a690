//! Archetype Resolver
//!
//! Translates a single media signal into zero or more fashion archetypes by
//! walking two catalog hops:
//!
//! ```text
//! movie title ──(TMDB title search)──► genre ids ──► genre names ─┐
//! genre ──────────────────────────────────────────────────────────┼─► tags ──► archetypes
//! music genre ────────────────────────────────────────────────────┘
//! ```
//!
//! Every miss degrades to "nothing from that hop". The movie path makes
//! exactly one metadata call; the genre and music paths make none.

use crate::catalog::StyleCatalog;
use crate::types::{ArchetypeSet, MatchContext, MediaInput, MovieMetadata};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ArchetypeResolver {
    catalog: Arc<StyleCatalog>,
    metadata: Arc<dyn MovieMetadata>,
}

impl ArchetypeResolver {
    pub fn new(catalog: Arc<StyleCatalog>, metadata: Arc<dyn MovieMetadata>) -> Self {
        Self { catalog, metadata }
    }

    pub fn catalog(&self) -> &Arc<StyleCatalog> {
        &self.catalog
    }

    /// Resolve a media input to its archetype set
    pub async fn resolve(&self, ctx: &MatchContext, input: &MediaInput) -> ArchetypeSet {
        let tags = match input {
            MediaInput::Movie(title) => self.movie_tags(ctx, title).await,
            MediaInput::Genre(genre) => self.catalog.genre_tags(genre).iter().cloned().collect(),
            MediaInput::Music(music) => self.catalog.music_tags(music).iter().cloned().collect(),
        };

        let archetypes = self.archetypes_for_tags(tags.iter().map(String::as_str));

        debug!(
            session_id = %ctx.session_id,
            kind = ?input.kind(),
            tags = tags.len(),
            archetypes = archetypes.len(),
            "Archetypes resolved"
        );

        archetypes
    }

    /// Genre path (no external calls)
    pub fn resolve_genre(&self, genre: &str) -> ArchetypeSet {
        self.archetypes_for_tags(self.catalog.genre_tags(genre).iter().map(String::as_str))
    }

    /// Music path (no external calls)
    pub fn resolve_music(&self, music: &str) -> ArchetypeSet {
        self.archetypes_for_tags(self.catalog.music_tags(music).iter().map(String::as_str))
    }

    /// Union of tag→archetype entries for every tag
    pub fn archetypes_for_tags<'a, I>(&self, tags: I) -> ArchetypeSet
    where
        I: IntoIterator<Item = &'a str>,
    {
        tags.into_iter()
            .flat_map(|tag| self.catalog.tag_styles(tag).iter().cloned())
            .collect()
    }

    /// Title → genre ids → deduplicated tags
    async fn movie_tags(&self, ctx: &MatchContext, title: &str) -> BTreeSet<String> {
        let title = title.trim();
        if title.is_empty() {
            return BTreeSet::new();
        }

        let genre_ids = match self.metadata.genre_ids_for_title(ctx, title).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(
                    session_id = %ctx.session_id,
                    title = %title,
                    error = %e,
                    "Movie metadata lookup failed, treating as no match"
                );
                return BTreeSet::new();
            }
        };

        genre_ids
            .into_iter()
            .filter_map(|id| self.catalog.genre_name(id))
            .flat_map(|genre| self.catalog.genre_tags(genre).iter().cloned())
            .collect()
    }
}
