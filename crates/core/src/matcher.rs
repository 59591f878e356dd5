//! Topical matching — the pluggable relevance seam.
//!
//! The default matcher is a case-insensitive keyword-overlap heuristic.
//! An embeddings-based matcher can be swapped in behind the same trait
//! without touching dedup or packing logic.

use crate::document::Document;

/// Computes the topical match weight `Tm ∈ [0, 1]` between a document and
/// the query keyword set.
pub trait TopicMatcher: Send + Sync {
    /// The matcher name (e.g. "keyword").
    fn name(&self) -> &str;

    /// Topical match weight in [0, 1]. Zero means no topical overlap —
    /// the document is gated out regardless of its trust signals.
    fn topical_match(&self, doc: &Document, keywords: &[String]) -> f64;
}

/// Split text into lowercased alphanumeric tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// The default matcher: proportion of query keywords present in the
/// document's topic and tags.
#[derive(Debug, Default)]
pub struct KeywordMatcher;

impl TopicMatcher for KeywordMatcher {
    fn name(&self) -> &str {
        "keyword"
    }

    fn topical_match(&self, doc: &Document, keywords: &[String]) -> f64 {
        // No topical signal in the query means no gate: every candidate in
        // the pack is equally "on topic".
        if keywords.is_empty() {
            return 1.0;
        }

        let mut doc_tokens = tokenize(&doc.topic);
        for tag in &doc.tags {
            doc_tokens.extend(tokenize(tag));
        }

        let hits = keywords
            .iter()
            .filter(|kw| doc_tokens.iter().any(|t| t == *kw))
            .count();
        hits as f64 / keywords.len() as f64
    }
}
