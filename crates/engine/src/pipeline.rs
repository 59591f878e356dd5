//! The request pipeline: fetch → score → dedup/staleness → pack.
//!
//! `ContextEngine` owns no state beyond its collaborators — the store and
//! the topical matcher are injected (never a process-wide singleton), so
//! multiple stores/tenants coexist and test independently. Each call is an
//! independent computation; concurrent queries share nothing mutable.
//!
//! Callers always get either a well-formed `AssembledContext` (possibly
//! empty, with reasons) or one of the two fatal errors — never a silent
//! empty success indistinguishable from "nothing matched".

use crate::context::{AssembledContext, ScoredCandidate};
use crate::dedup;
use crate::packer::ContextPacker;
use crate::scorer::RelevanceScorer;
use chrono::{DateTime, Utc};
use packloom_config::AppConfig;
use packloom_core::{DocumentStore, Error, KeywordMatcher, Query, Result, TopicMatcher};
use std::sync::Arc;
use tracing::{debug, warn};

/// The knowledge pack retrieval & context assembly engine.
pub struct ContextEngine {
    store: Arc<dyn DocumentStore>,
    scorer: RelevanceScorer,
    packer: ContextPacker,
    stale_days: i64,
    default_budget_bytes: usize,
}

impl ContextEngine {
    /// Create an engine over a store with the default keyword matcher.
    pub fn new(store: Arc<dyn DocumentStore>, config: &AppConfig) -> Self {
        Self::with_matcher(store, Arc::new(KeywordMatcher), config)
    }

    /// Create an engine with a custom topical matcher (e.g. an
    /// embeddings-backed one) behind the same pipeline.
    pub fn with_matcher(
        store: Arc<dyn DocumentStore>,
        matcher: Arc<dyn TopicMatcher>,
        config: &AppConfig,
    ) -> Self {
        Self {
            store,
            scorer: RelevanceScorer::new(matcher, config.scoring.freshness_half_life_days),
            packer: ContextPacker::new(
                config.packing.separator.clone(),
                config.scoring.min_score,
                config.packing.max_candidates_scanned,
            ),
            stale_days: config.scoring.stale_days,
            default_budget_bytes: config.packing.default_budget_bytes,
        }
    }

    /// Assemble a context for one query.
    ///
    /// `now` anchors freshness decay and staleness; passing it explicitly
    /// keeps the whole pipeline reproducible bit-for-bit. A zero
    /// `budget_bytes` falls back to the configured default budget.
    pub async fn assemble(&self, query: &Query, now: DateTime<Utc>) -> Result<AssembledContext> {
        let budget_bytes = if query.budget_bytes == 0 {
            self.default_budget_bytes
        } else {
            query.budget_bytes
        };
        let min_bytes = self.packer.separator().len() + 1;
        if budget_bytes < min_bytes {
            return Err(Error::BudgetTooSmall {
                budget_bytes,
                min_bytes,
            });
        }

        // The sole suspension point; cancellation drops the fetch.
        let fetched = self.store.fetch_candidates(query).await?;
        if fetched.is_empty() {
            debug!(pack = %query.pack, "No candidates matched the query");
            return Ok(AssembledContext::empty(budget_bytes, "no-candidates"));
        }

        let keywords = query.keywords();
        let mut warnings = Vec::new();
        let scored: Vec<ScoredCandidate> = fetched
            .into_iter()
            .map(|doc| {
                if doc.confidence.is_none() {
                    warn!(id = %doc.id, "Document missing confidence; scoring as 0");
                    warnings.push(format!("document {} missing confidence; scored as 0", doc.id));
                }
                let score = self.scorer.score(&doc, &keywords, now);
                ScoredCandidate {
                    score,
                    stale: false,
                    document: doc,
                }
            })
            .collect();

        let candidate_count = scored.len();
        let (survivors, exclusions) = dedup::filter(scored, now, self.stale_days);
        debug!(
            pack = %query.pack,
            candidates = candidate_count,
            survivors = survivors.len(),
            duplicates = exclusions.len(),
            "Candidates scored and deduplicated"
        );

        let context = self.packer.pack(survivors, budget_bytes, exclusions, warnings)?;
        debug!(
            pack = %query.pack,
            included = context.metadata.included.len(),
            excluded = context.metadata.excluded.len(),
            bytes_used = context.metadata.bytes_used,
            budget_bytes,
            "Context assembled"
        );
        Ok(context)
    }
}
