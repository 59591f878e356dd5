//! Document store trait — the read-only candidate source.
//!
//! The store is the only external collaborator that performs I/O; every
//! other stage of the pipeline is pure computation over its results.
//! Implementations: markdown corpus directory, SQLite with FTS5, in-memory
//! (for testing).

use crate::document::Document;
use crate::query::Query;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Pack not found: {0}")]
    PackNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),
}

/// Summary of one pack as seen by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackInfo {
    /// Pack name.
    pub name: String,
    /// Distinct (pack, slug) subjects.
    pub subjects: usize,
    /// Total document versions, including superseded ones.
    pub versions: usize,
}

/// The core DocumentStore trait.
///
/// Read-only from the engine's perspective: ingestion happens out of band,
/// and a content update always lands as a new version rather than a
/// mutation. `fetch_candidates` is the pipeline's sole suspension point.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// The backend name (e.g. "file", "sqlite", "in_memory").
    fn name(&self) -> &str;

    /// Fetch all candidate versions for a query.
    ///
    /// Returns every version in the query's pack whose tags intersect the
    /// query's tag filter, or whose topic loosely matches the topic hint.
    /// A query with neither filter returns the whole pack. Fails with
    /// `PackNotFound` if the pack is unknown to the store.
    async fn fetch_candidates(&self, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Retrieve a single document version by explicit id, current or not.
    async fn get(&self, id: &str) -> Result<Option<Document>, StoreError>;

    /// Enumerate the packs this store knows about.
    async fn packs(&self) -> Result<Vec<PackInfo>, StoreError>;

    /// Total document version count across all packs.
    async fn count(&self) -> Result<usize, StoreError>;
}

/// Shared candidate predicate: tags intersect the filter (if provided) or
/// the topic loosely matches the hint (keyword/substring). With neither
/// filter, everything in the pack is a candidate.
pub fn matches_query(doc: &Document, query: &Query) -> bool {
    let tag_filtered = !query.tags.is_empty();
    let hint_filtered = query.topic_hint.as_deref().is_some_and(|h| !h.trim().is_empty());

    if !tag_filtered && !hint_filtered {
        return true;
    }

    if tag_filtered {
        let tag_hit = query
            .tags
            .iter()
            .any(|t| doc.tags.iter().any(|dt| dt.eq_ignore_ascii_case(t)));
        if tag_hit {
            return true;
        }
    }

    if hint_filtered {
        let hint = query.topic_hint.as_deref().unwrap_or_default();
        let topic_lower = doc.topic.to_lowercase();
        let hint_lower = hint.to_lowercase();
        if topic_lower.contains(&hint_lower) {
            return true;
        }
        let keywords = crate::matcher::tokenize(hint);
        let topic_tokens = crate::matcher::tokenize(&doc.topic);
        if keywords.iter().any(|kw| topic_tokens.contains(kw)) {
            return true;
        }
    }

    false
}
