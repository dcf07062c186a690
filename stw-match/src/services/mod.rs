//! Matching services
//!
//! - [`ArchetypeResolver`]: media signal → archetype set
//! - [`ProviderCascade`]: ordered fallback across providers for one need
//! - [`SongMatcher`]: song → archetypes, similar songs
//! - [`StyleLookbook`]: archetype → search phrase, photos, brand links

pub mod archetype_resolver;
pub mod provider_cascade;
pub mod song_matcher;
pub mod style_lookbook;

pub use archetype_resolver::ArchetypeResolver;
pub use provider_cascade::{AttemptOutcome, CascadeOutcome, ProviderAttempt, ProviderCascade};
pub use song_matcher::{SongArchetypes, SongMatcher};
pub use style_lookbook::{BrandLink, StyleLook, StyleLookbook};
