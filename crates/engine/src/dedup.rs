//! Deduplication & staleness management.
//!
//! Candidates are grouped by (pack, slug). Within a group only one version
//! survives — the one with the latest `last_verified`, tie-broken by
//! higher confidence, then higher `sources_checked`, then lexicographically
//! smaller id (a total, deterministic order). Losers are reported
//! `duplicate`.
//!
//! Survivors past the staleness threshold are flagged and their score is
//! halved — confidence decays, it doesn't vanish. A slightly outdated fact
//! beats no fact, so stale documents stay selectable when nothing fresher
//! competes.

use crate::context::{Exclusion, ExclusionReason, ScoredCandidate};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Collapse duplicate versions and flag stale survivors.
///
/// Returns the surviving candidates (grouped order, deterministic) and the
/// exclusion records for every collapsed duplicate.
pub fn filter(
    candidates: Vec<ScoredCandidate>,
    now: DateTime<Utc>,
    stale_days: i64,
) -> (Vec<ScoredCandidate>, Vec<Exclusion>) {
    let mut groups: BTreeMap<(String, String), Vec<ScoredCandidate>> = BTreeMap::new();
    for cand in candidates {
        let key = (cand.document.pack.clone(), cand.document.slug.clone());
        groups.entry(key).or_default().push(cand);
    }

    let mut survivors = Vec::with_capacity(groups.len());
    let mut excluded = Vec::new();

    for (_, mut group) in groups {
        group.sort_by(version_precedence);
        let mut winner = group.remove(0);
        for loser in group {
            excluded.push(Exclusion {
                id: loser.document.id.clone(),
                topic: loser.document.topic.clone(),
                reason: ExclusionReason::Duplicate,
            });
        }

        let age_days = (now - winner.document.last_verified).num_days();
        if age_days > stale_days {
            debug!(
                id = %winner.document.id,
                age_days,
                "Candidate past staleness threshold; deprioritizing"
            );
            winner.stale = true;
            winner.score *= 0.5;
        }
        survivors.push(winner);
    }

    (survivors, excluded)
}

/// Total order over versions of the same subject: the winner sorts first.
fn version_precedence(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.document
        .last_verified
        .cmp(&a.document.last_verified)
        .then_with(|| {
            b.document
                .confidence_or_default()
                .cmp(&a.document.confidence_or_default())
        })
        .then_with(|| b.document.sources_checked.cmp(&a.document.sources_checked))
        .then_with(|| a.document.id.cmp(&b.document.id))
}
