//! The retrieval query model.

use crate::matcher::tokenize;
use serde::{Deserialize, Serialize};

/// A single retrieval request. Transient — created per request, discarded
/// after the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// The pack to search (required).
    pub pack: String,

    /// Free-text topical hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_hint: Option<String>,

    /// Tag filter set. Empty = no tag filtering.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Hard ceiling on the assembled output size in bytes.
    pub budget_bytes: usize,
}

impl Query {
    /// Extract the lowercased keyword set from the topic hint and tags,
    /// sorted and deduplicated so downstream scoring is order-independent.
    pub fn keywords(&self) -> Vec<String> {
        let mut words: Vec<String> = self
            .topic_hint
            .as_deref()
            .map(tokenize)
            .unwrap_or_default();
        for tag in &self.tags {
            words.extend(tokenize(tag));
        }
        words.sort();
        words.dedup();
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_from_hint_and_tags() {
        let q = Query {
            pack: "solana".into(),
            topic_hint: Some("Bridge Integration".into()),
            tags: vec!["rpc".into(), "bridge".into()],
            budget_bytes: 1024,
        };
        assert_eq!(q.keywords(), vec!["bridge", "integration", "rpc"]);
    }

    #[test]
    fn no_hint_no_tags_is_empty() {
        let q = Query {
            pack: "solana".into(),
            topic_hint: None,
            tags: vec![],
            budget_bytes: 1024,
        };
        assert!(q.keywords().is_empty());
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let q = Query {
            pack: "solana".into(),
            topic_hint: Some("RPC Retries".into()),
            tags: vec![],
            budget_bytes: 1024,
        };
        assert_eq!(q.keywords(), vec!["retries", "rpc"]);
    }
}
