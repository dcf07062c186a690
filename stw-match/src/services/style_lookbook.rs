//! Style Lookbook
//!
//! Turns archetypes into something to look at: the catalog search phrase,
//! photos from the image cascade and brand links. Archetypes are handled one
//! after another.

use crate::catalog::{normalize_key, StyleCatalog};
use crate::services::ProviderCascade;
use crate::types::{ImageResult, MatchContext};
use reqwest::Url;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Web search used for brand links
const BRAND_SEARCH_URL: &str = "https://www.google.com/search";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandLink {
    pub name: String,
    pub search_url: String,
}

/// One archetype ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleLook {
    pub archetype: String,
    pub search_phrase: String,
    /// First photo, `null` when every image provider came back empty
    pub image: Option<ImageResult>,
    pub images: Vec<ImageResult>,
    /// Image provider that supplied the photos
    pub image_source: Option<&'static str>,
    pub brands: Vec<BrandLink>,
}

pub struct StyleLookbook {
    catalog: Arc<StyleCatalog>,
    images: Arc<ProviderCascade<ImageResult>>,
}

impl StyleLookbook {
    pub fn new(catalog: Arc<StyleCatalog>, images: Arc<ProviderCascade<ImageResult>>) -> Self {
        Self { catalog, images }
    }

    /// Detailed look with up to `count` photos
    pub async fn look(&self, ctx: &MatchContext, archetype: &str, count: usize) -> StyleLook {
        let archetype = normalize_key(archetype);
        let search_phrase = self.catalog.search_phrase(&archetype);

        let outcome = self.images.run(ctx, &search_phrase, count).await;
        debug!(
            session_id = %ctx.session_id,
            archetype = %archetype,
            images = outcome.items.len(),
            source = ?outcome.source,
            "Style look built"
        );

        StyleLook {
            brands: self.brand_links(&archetype),
            image: outcome.items.first().cloned(),
            images: outcome.items,
            image_source: outcome.source,
            search_phrase,
            archetype,
        }
    }

    /// One photo per archetype, in input order, duplicates and blanks skipped
    pub async fn overview(&self, ctx: &MatchContext, archetypes: &[String]) -> Vec<StyleLook> {
        let mut seen = Vec::new();
        let mut looks = Vec::new();
        for archetype in archetypes {
            let key = normalize_key(archetype);
            if key.is_empty() || seen.contains(&key) {
                continue;
            }
            looks.push(self.look(ctx, &key, 1).await);
            seen.push(key);
        }
        looks
    }

    pub fn brand_links(&self, archetype: &str) -> Vec<BrandLink> {
        self.catalog
            .brands(archetype)
            .iter()
            .filter_map(|brand| {
                brand_search_url(brand).map(|search_url| BrandLink {
                    name: brand.clone(),
                    search_url,
                })
            })
            .collect()
    }
}

fn brand_search_url(brand: &str) -> Option<String> {
    Url::parse_with_params(BRAND_SEARCH_URL, &[("q", format!("{} clothing", brand))])
        .ok()
        .map(|url| url.to_string())
}
