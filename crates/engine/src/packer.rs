//! Context packing — budget-constrained selection and serialization.
//!
//! A 0/1 knapsack over bytes, solved greedily: candidate counts are tens,
//! not thousands, so per-candidate overhead dominates and exact DP buys
//! nothing. The refinement that matters is **greedy-with-skip**: when a
//! candidate would overflow the remaining budget we skip it and keep
//! scanning, so lower-scored-but-smaller documents can still fill the gap
//! a single huge document would otherwise block.
//!
//! Accepted bodies are joined by the reserved separator literal (n
//! documents cost n−1 separators). The separator is a contract surface:
//! consumers split on it to recover individual documents.

use crate::context::{
    AssembledContext, ContextMetadata, Exclusion, ExclusionReason, IncludedDocument,
    ScoredCandidate,
};
use packloom_core::Error;
use std::cmp::Ordering;
use tracing::debug;

/// Packs ranked candidates into a byte-budgeted payload.
pub struct ContextPacker {
    separator: String,
    /// Eligibility floor: candidates scoring at or below it are reported
    /// `low-score` and never scanned.
    min_score: f64,
    /// Safety cap on candidates scanned, bounding worst-case packing cost.
    max_candidates_scanned: usize,
}

impl ContextPacker {
    pub fn new(separator: impl Into<String>, min_score: f64, max_candidates_scanned: usize) -> Self {
        Self {
            separator: separator.into(),
            min_score,
            max_candidates_scanned,
        }
    }

    /// The reserved separator literal this packer serializes with.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Select and serialize candidates under `budget_bytes`.
    ///
    /// `carried_exclusions` are records produced upstream (duplicates from
    /// dedup) that must appear in the final report; `warnings` likewise.
    ///
    /// # Errors
    ///
    /// `BudgetTooSmall` when the budget cannot hold the separator plus one
    /// byte of content.
    pub fn pack(
        &self,
        mut candidates: Vec<ScoredCandidate>,
        budget_bytes: usize,
        carried_exclusions: Vec<Exclusion>,
        warnings: Vec<String>,
    ) -> Result<AssembledContext, Error> {
        let min_bytes = self.separator.len() + 1;
        if budget_bytes < min_bytes {
            return Err(Error::BudgetTooSmall {
                budget_bytes,
                min_bytes,
            });
        }

        // Rank: score descending; ties prefer the cheaper document (more
        // fits into the budget), then smaller id for a total order.
        candidates.sort_by(rank_order);

        let mut excluded = carried_exclusions;

        // Scan cap: the ranked tail is by construction the lowest-scored slice.
        if candidates.len() > self.max_candidates_scanned {
            for cut in candidates.split_off(self.max_candidates_scanned) {
                excluded.push(exclusion_for(&cut, ExclusionReason::LowScore));
            }
        }

        let mut eligible = Vec::with_capacity(candidates.len());
        for cand in candidates {
            if cand.score <= self.min_score {
                excluded.push(exclusion_for(&cand, ExclusionReason::LowScore));
            } else {
                eligible.push(cand);
            }
        }

        let mut included: Vec<IncludedDocument> = Vec::new();
        let mut bodies: Vec<&str> = Vec::new();
        let mut used = 0usize;
        let mut skipped: Vec<&ScoredCandidate> = Vec::new();

        for cand in &eligible {
            let size = cand.document.size_bytes();
            let cost = if bodies.is_empty() {
                size
            } else {
                self.separator.len() + size
            };
            if used + cost <= budget_bytes {
                used += cost;
                bodies.push(&cand.document.body);
                included.push(IncludedDocument {
                    id: cand.document.id.clone(),
                    topic: cand.document.topic.clone(),
                    score: cand.score,
                    bytes: size,
                    truncated: false,
                    stale: cand.stale,
                });
            } else {
                skipped.push(cand);
            }
        }

        // Nothing fit, but something was eligible: truncate the top-ranked
        // candidate rather than return an empty context.
        let mut truncated_body = String::new();
        if included.is_empty() && !eligible.is_empty() {
            let top = &eligible[0];
            let cut = truncate_at_boundary(&top.document.body, budget_bytes);
            if !cut.is_empty() {
                truncated_body = cut.to_string();
                used = truncated_body.len();
                included.push(IncludedDocument {
                    id: top.document.id.clone(),
                    topic: top.document.topic.clone(),
                    score: top.score,
                    bytes: used,
                    truncated: true,
                    stale: top.stale,
                });
                skipped.retain(|c| c.document.id != top.document.id);
                debug!(
                    id = %top.document.id,
                    bytes = used,
                    budget_bytes,
                    "Truncated top candidate to fit budget"
                );
            }
        }

        for cand in skipped {
            let reason = if cand.stale {
                ExclusionReason::StaleDeprioritizedAndUnselected
            } else {
                ExclusionReason::OverBudget
            };
            excluded.push(exclusion_for(cand, reason));
        }

        let body = if truncated_body.is_empty() {
            bodies.join(&self.separator)
        } else {
            truncated_body
        };

        Ok(AssembledContext {
            metadata: ContextMetadata {
                bytes_used: body.len(),
                budget_bytes,
                included,
                excluded,
                warnings,
                reason: None,
            },
            body,
        })
    }
}

/// Packing rank: score descending, then smaller body, then smaller id.
pub(crate) fn rank_order(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.document.size_bytes().cmp(&b.document.size_bytes()))
        .then_with(|| a.document.id.cmp(&b.document.id))
}

fn exclusion_for(cand: &ScoredCandidate, reason: ExclusionReason) -> Exclusion {
    Exclusion {
        id: cand.document.id.clone(),
        topic: cand.document.topic.clone(),
        reason,
    }
}

/// Cut `body` to at most `limit` bytes, preferring the nearest paragraph
/// boundary and never splitting a UTF-8 code point.
fn truncate_at_boundary(body: &str, limit: usize) -> &str {
    if body.len() <= limit {
        return body;
    }
    let mut end = limit;
    while end > 0 && !body.is_char_boundary(end) {
        end -= 1;
    }
    let window = &body[..end];
    if let Some(pos) = window.rfind("\n\n") {
        if pos > 0 {
            return &body[..pos];
        }
    }
    window
}
