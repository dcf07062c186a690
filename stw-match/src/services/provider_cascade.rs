//! Provider Fallback Cascade
//!
//! Tries providers strictly in priority order and stops at the first one
//! that answers without error AND returns at least one item:
//!
//! ```text
//! NotStarted → Trying[0] ─ok, non-empty─► Success
//!                 │
//!            empty/error
//!                 ▼
//!              Trying[1] ─ ... ─► Trying[n-1] ─empty/error─► Exhausted
//! ```
//!
//! Errors never escape: a failing provider is logged and skipped. Exhaustion
//! is an ordinary outcome with no items. Providers are called one after the
//! other, never concurrently, and each at most once per run.

use crate::types::{MatchContext, Provider};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of one provider call within a cascade run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Empty,
    Failed { reason: String },
    Succeeded { count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderAttempt {
    pub provider: &'static str,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

/// Outcome of a cascade run
#[derive(Debug, Clone)]
pub struct CascadeOutcome<T> {
    /// Items of the first provider that produced any (empty when exhausted)
    pub items: Vec<T>,
    /// Provider that supplied `items`
    pub source: Option<&'static str>,
    /// Every provider call made, in order
    pub attempts: Vec<ProviderAttempt>,
}

impl<T> CascadeOutcome<T> {
    /// True when every provider came back empty or failed
    pub fn is_exhausted(&self) -> bool {
        self.source.is_none()
    }
}

/// Ordered provider list for one logical need
pub struct ProviderCascade<T> {
    need: &'static str,
    providers: Vec<Arc<dyn Provider<T>>>,
}

impl<T: Send + 'static> ProviderCascade<T> {
    /// Create a cascade; `providers` is in priority order
    pub fn new(need: &'static str, providers: Vec<Arc<dyn Provider<T>>>) -> Self {
        Self { need, providers }
    }

    /// Provider names in priority order
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Run the cascade for `query`
    pub async fn run(&self, ctx: &MatchContext, query: &str, count: usize) -> CascadeOutcome<T> {
        let mut attempts = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let name = provider.name();
            match provider.fetch(ctx, query, count).await {
                Ok(items) if !items.is_empty() => {
                    info!(
                        session_id = %ctx.session_id,
                        need = self.need,
                        provider = name,
                        count = items.len(),
                        "Cascade satisfied"
                    );
                    attempts.push(ProviderAttempt {
                        provider: name,
                        outcome: AttemptOutcome::Succeeded { count: items.len() },
                    });
                    return CascadeOutcome {
                        items,
                        source: Some(name),
                        attempts,
                    };
                }
                Ok(_) => {
                    debug!(
                        session_id = %ctx.session_id,
                        need = self.need,
                        provider = name,
                        query = %query,
                        "Provider returned no results, trying next"
                    );
                    attempts.push(ProviderAttempt {
                        provider: name,
                        outcome: AttemptOutcome::Empty,
                    });
                }
                Err(e) => {
                    warn!(
                        session_id = %ctx.session_id,
                        need = self.need,
                        provider = name,
                        query = %query,
                        error = %e,
                        "Provider failed, trying next"
                    );
                    attempts.push(ProviderAttempt {
                        provider: name,
                        outcome: AttemptOutcome::Failed {
                            reason: e.to_string(),
                        },
                    });
                }
            }
        }

        info!(
            session_id = %ctx.session_id,
            need = self.need,
            query = %query,
            providers = self.providers.len(),
            "Cascade exhausted"
        );

        CascadeOutcome {
            items: Vec::new(),
            source: None,
            attempts,
        }
    }
}
