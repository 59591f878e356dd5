//! Pipeline value types: scored candidates, the assembled context, and the
//! exclusion report.
//!
//! All of these are transient — created per request and discarded after
//! the response. The exclusion report is a contract surface: every
//! candidate returned by the store appears exactly once across
//! included ∪ excluded, so nothing silently disappears.

use packloom_core::Document;
use serde::{Deserialize, Serialize};

/// A document with its computed relevance score and staleness flag.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub document: Document,
    /// Final relevance score; zero topical overlap forces zero.
    pub score: f64,
    /// Verification age exceeded the staleness threshold. Stale candidates
    /// are deprioritized (score halved), never auto-excluded.
    pub stale: bool,
}

/// Why a candidate did not make it into the packed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusionReason {
    /// Scored at or below the eligibility floor (includes zero topical overlap
    /// and candidates ranked past the scan cap).
    LowScore,
    /// Superseded by a version of the same subject with a newer verification.
    Duplicate,
    /// Flagged stale, deprioritized, and ultimately not selected.
    StaleDeprioritizedAndUnselected,
    /// Eligible but did not fit the remaining byte budget.
    OverBudget,
}

impl ExclusionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowScore => "low-score",
            Self::Duplicate => "duplicate",
            Self::StaleDeprioritizedAndUnselected => "stale-deprioritized-and-unselected",
            Self::OverBudget => "over-budget",
        }
    }
}

/// One entry in the exclusion report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exclusion {
    pub id: String,
    pub topic: String,
    pub reason: ExclusionReason,
}

/// One document accepted into the packed output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncludedDocument {
    pub id: String,
    pub topic: String,
    pub score: f64,
    /// Bytes of this document's body as serialized (post-truncation).
    pub bytes: usize,
    /// The body was cut at a paragraph boundary to fit the budget.
    pub truncated: bool,
    /// Included despite being past the staleness threshold.
    pub stale: bool,
}

/// Structured metadata accompanying the serialized body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextMetadata {
    /// Bytes of the serialized body, separators included.
    pub bytes_used: usize,
    /// The budget the packer worked against.
    pub budget_bytes: usize,
    pub included: Vec<IncludedDocument>,
    pub excluded: Vec<Exclusion>,
    /// Non-fatal per-document anomalies absorbed during the request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Set when the context is empty by construction (e.g. "no-candidates").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// The final assembled payload: document bodies joined by the reserved
/// separator literal, plus the metadata block. Consumers split the body on
/// the separator to recover individual documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledContext {
    pub body: String,
    pub metadata: ContextMetadata,
}

impl AssembledContext {
    /// An empty context with an explicit reason — never an error.
    pub fn empty(budget_bytes: usize, reason: &str) -> Self {
        Self {
            body: String::new(),
            metadata: ContextMetadata {
                bytes_used: 0,
                budget_bytes,
                included: Vec::new(),
                excluded: Vec::new(),
                warnings: Vec::new(),
                reason: Some(reason.to_string()),
            },
        }
    }
}
