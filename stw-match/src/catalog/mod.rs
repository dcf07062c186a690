//! Static lookup catalog
//!
//! Holds every table the archetype pipeline walks:
//! genre→tags, music→tags, tag→style, style→brands, style→search phrase,
//! plus the TMDB genre id mapping and the genre vocabulary.
//!
//! The catalog is built once at startup (built-in tables or a TOML override)
//! and shared read-only through `Arc`. Lookups on unknown keys return an empty
//! slice; they never fail.

mod builtin;

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use stw_common::{Error, Result};
use tracing::info;

static BUILTIN: Lazy<Arc<StyleCatalog>> = Lazy::new(|| Arc::new(builtin::catalog()));

/// Normalize a lookup key (trimmed, lower-case)
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Ordered key → values table
///
/// Keys are normalized on insert and on lookup, so lookups are
/// case-insensitive. Insertion order of keys is preserved.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl LookupTable {
    /// Build from (key, values) pairs; a repeated key replaces the earlier values
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut table = Self::default();
        for (key, values) in entries {
            let key = normalize_key(key.as_ref());
            let values: Vec<String> = values.into_iter().map(Into::into).collect();
            match table.index.get(&key) {
                Some(&pos) => table.entries[pos].1 = values,
                None => {
                    table.index.insert(key.clone(), table.entries.len());
                    table.entries.push((key, values));
                }
            }
        }
        table
    }

    /// Values for `key`, empty when the key is unknown
    pub fn get(&self, key: &str) -> &[String] {
        self.index
            .get(&normalize_key(key))
            .map(|&pos| self.entries[pos].1.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(&normalize_key(key))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable collection of every lookup table
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    genres: Vec<String>,
    tmdb_genres: HashMap<u32, String>,
    genre_tags: LookupTable,
    music_tags: LookupTable,
    tag_styles: LookupTable,
    style_brands: LookupTable,
    search_terms: HashMap<String, String>,
}

impl StyleCatalog {
    /// Shared built-in catalog
    pub fn builtin() -> Arc<StyleCatalog> {
        Arc::clone(&BUILTIN)
    }

    /// Load the catalog: TOML override when a path is given, built-in otherwise
    pub fn load(path: Option<&Path>) -> Result<Arc<StyleCatalog>> {
        let Some(path) = path else {
            info!("Using built-in style catalog");
            return Ok(Self::builtin());
        };

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Read catalog failed ({}): {}", path.display(), e))
        })?;
        let catalog = Self::from_toml_str(&content)?;
        info!(
            path = %path.display(),
            genres = catalog.genres.len(),
            tags = catalog.tag_styles.len(),
            "Style catalog loaded"
        );
        Ok(Arc::new(catalog))
    }

    /// Parse a catalog override
    ///
    /// Table keys in a TOML override are ordered alphabetically; music
    /// genre detection follows that order.
    pub fn from_toml_str(content: &str) -> Result<StyleCatalog> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse catalog failed: {}", e)))?;

        if file.genres.is_empty() {
            return Err(Error::Config("Catalog genre list is empty".to_string()));
        }
        let genres: Vec<String> = file.genres.iter().map(|g| normalize_key(g)).collect();

        let mut tmdb_genres = HashMap::new();
        for (id, name) in file.tmdb_genres {
            let id: u32 = id.trim().parse().map_err(|_| {
                Error::Config(format!("Catalog TMDB genre id is not numeric: {:?}", id))
            })?;
            let name = normalize_key(&name);
            if !genres.contains(&name) {
                return Err(Error::Config(format!(
                    "Catalog TMDB genre {} maps to unknown genre {:?}",
                    id, name
                )));
            }
            tmdb_genres.insert(id, name);
        }

        let search_terms = file
            .style_search_terms
            .into_iter()
            .map(|(style, phrase)| (normalize_key(&style), phrase))
            .collect();

        Ok(StyleCatalog {
            genres,
            tmdb_genres,
            genre_tags: LookupTable::from_entries(file.genre_tags),
            music_tags: LookupTable::from_entries(file.music_tags),
            tag_styles: LookupTable::from_entries(file.tag_styles),
            style_brands: LookupTable::from_entries(file.style_brands),
            search_terms,
        })
    }

    /// Movie genre vocabulary
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// Genre name for a TMDB genre id
    pub fn genre_name(&self, tmdb_id: u32) -> Option<&str> {
        self.tmdb_genres.get(&tmdb_id).map(String::as_str)
    }

    /// TMDB genre id for a genre name
    pub fn genre_id(&self, genre: &str) -> Option<u32> {
        let genre = normalize_key(genre);
        self.tmdb_genres
            .iter()
            .find(|(_, name)| **name == genre)
            .map(|(id, _)| *id)
    }

    pub fn genre_tags(&self, genre: &str) -> &[String] {
        self.genre_tags.get(genre)
    }

    pub fn music_tags(&self, music: &str) -> &[String] {
        self.music_tags.get(music)
    }

    /// Music genre keys in detection order
    pub fn music_genres(&self) -> impl Iterator<Item = &str> {
        self.music_tags.keys()
    }

    pub fn tag_styles(&self, tag: &str) -> &[String] {
        self.tag_styles.get(tag)
    }

    pub fn brands(&self, style: &str) -> &[String] {
        self.style_brands.get(style)
    }

    /// Image search phrase for a style (`"<style> outfit"` when unmapped)
    pub fn search_phrase(&self, style: &str) -> String {
        let key = normalize_key(style);
        match self.search_terms.get(&key) {
            Some(phrase) => phrase.clone(),
            None => format!("{} outfit", key),
        }
    }
}

/// TOML schema of a catalog override
#[derive(Debug, Deserialize)]
struct CatalogFile {
    genres: Vec<String>,
    #[serde(default)]
    tmdb_genres: BTreeMap<String, String>,
    #[serde(default)]
    genre_tags: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    music_tags: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    tag_styles: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    style_brands: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    style_search_terms: BTreeMap<String, String>,
}
