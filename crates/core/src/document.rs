//! The knowledge document model.
//!
//! A `Document` is one immutable version of a knowledge article. Content
//! updates never mutate a document in place — they produce a new version
//! with a new `last_updated` and therefore a new id. The store exposes
//! exactly one "current" version per (pack, slug), but older versions stay
//! retrievable by explicit id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One immutable version of a knowledge article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier, unique per (pack, slug, version).
    pub id: String,

    /// Namespace grouping documents on one subject area.
    pub pack: String,

    /// Human-readable subject line, used for topical matching.
    pub topic: String,

    /// Normalized slug derived from the topic (dedup grouping key).
    pub slug: String,

    /// Author-asserted trust score, 0–10. `None` when the source article
    /// omitted it — scored as 0, never rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,

    /// Count of corroborating sources; secondary trust signal.
    #[serde(default)]
    pub sources_checked: u32,

    /// When the content of this version was written.
    pub last_updated: DateTime<Utc>,

    /// When the facts were last verified; freshness input.
    pub last_verified: DateTime<Utc>,

    /// Raw article text. Its byte length is what the packer budgets against.
    pub body: String,

    /// Tags for coarse filtering.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Document {
    /// Byte size of the body — the unit the packer budgets against.
    pub fn size_bytes(&self) -> usize {
        self.body.len()
    }

    /// Confidence clamped into [0, 10], defaulting missing values to 0.
    pub fn confidence_or_default(&self) -> u8 {
        self.confidence.map(|c| c.min(10)).unwrap_or(0)
    }
}

/// Normalize a topic into a slug: lowercase, alphanumeric runs joined by
/// single hyphens. `"Bridge  Integration (v2)"` → `"bridge-integration-v2"`.
pub fn normalize_slug(topic: &str) -> String {
    let mut slug = String::with_capacity(topic.len());
    let mut pending_sep = false;
    for ch in topic.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_sep = true;
        }
    }
    slug
}

/// Derive the stable document id for one version.
///
/// Format: `<pack>/<slug>#<hex8>` where the suffix is the first 8 hex chars
/// of `sha256(pack | slug | last_updated)`. Deterministic, so re-ingesting
/// the same corpus yields the same ids.
pub fn derive_id(pack: &str, slug: &str, last_updated: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pack.as_bytes());
    hasher.update(b"|");
    hasher.update(slug.as_bytes());
    hasher.update(b"|");
    hasher.update(last_updated.to_rfc3339().as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest[..4].iter().map(|b| format!("{b:02x}")).collect();
    format!("{pack}/{slug}#{hex}")
}
