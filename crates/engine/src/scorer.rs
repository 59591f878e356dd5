//! Relevance scoring.
//!
//! Combines topical match, author confidence, corroboration, and freshness
//! into one score:
//!
//! ```text
//! score = Tm * (0.5 + 0.2*Cw + 0.15*Sw + 0.15*Fw)
//! ```
//!
//! Topical match is the dominant gate: a document with zero topical
//! overlap scores 0 regardless of confidence, so irrelevant-but-trusted
//! documents cannot crowd out relevant ones. Scoring is deterministic —
//! the caller passes `now` explicitly, and nothing here reads the clock
//! or randomness.

use chrono::{DateTime, Utc};
use packloom_core::{Document, TopicMatcher};
use std::sync::Arc;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Scores documents against a query keyword set.
pub struct RelevanceScorer {
    matcher: Arc<dyn TopicMatcher>,
    half_life_days: f64,
}

impl RelevanceScorer {
    /// Create a scorer with the given topical matcher and freshness
    /// half-life (days for a document to lose half its freshness weight).
    pub fn new(matcher: Arc<dyn TopicMatcher>, half_life_days: f64) -> Self {
        Self {
            matcher,
            half_life_days,
        }
    }

    /// Compute the relevance score for one document.
    ///
    /// `keywords` is the query's extracted keyword set (see
    /// [`packloom_core::Query::keywords`]); `now` anchors freshness decay.
    pub fn score(&self, doc: &Document, keywords: &[String], now: DateTime<Utc>) -> f64 {
        let tm = self.matcher.topical_match(doc, keywords);
        if tm <= 0.0 {
            return 0.0;
        }

        let cw = f64::from(doc.confidence_or_default()) / 10.0;
        let sw = (f64::from(doc.sources_checked) / 15.0).min(1.0);

        let age_days =
            ((now - doc.last_verified).num_seconds() as f64 / SECONDS_PER_DAY).max(0.0);
        let lambda = std::f64::consts::LN_2 / self.half_life_days;
        let fw = (-lambda * age_days).exp();

        tm * (0.5 + 0.2 * cw + 0.15 * sw + 0.15 * fw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use packloom_core::KeywordMatcher;

    fn scorer() -> RelevanceScorer {
        RelevanceScorer::new(Arc::new(KeywordMatcher), 180.0)
    }

    fn doc(topic: &str, confidence: Option<u8>, sources: u32, verified: DateTime<Utc>) -> Document {
        Document {
            id: "solana/x#0000".into(),
            pack: "solana".into(),
            topic: topic.into(),
            slug: packloom_core::normalize_slug(topic),
            confidence,
            sources_checked: sources,
            last_updated: verified,
            last_verified: verified,
            body: String::new(),
            tags: vec![],
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn zero_topical_overlap_gates_everything() {
        let s = scorer();
        let d = doc("Validator Economics", Some(10), 100, now());
        let score = s.score(&d, &["bridge".into()], now());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn fresh_full_match_scores_near_max() {
        let s = scorer();
        let d = doc("Bridge Integration", Some(10), 15, now());
        let score = s.score(&d, &["bridge".into(), "integration".into()], now());
        // Tm=1, Cw=1, Sw=1, Fw=1 → 0.5 + 0.2 + 0.15 + 0.15 = 1.0
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn freshness_halves_after_half_life() {
        let s = scorer();
        let fresh = doc("Bridge", Some(0), 0, now());
        let aged = doc("Bridge", Some(0), 0, now() - Duration::days(180));
        let kws = vec!["bridge".to_string()];

        // Only Fw differs: fresh → 0.5 + 0.15, aged → 0.5 + 0.075
        let fresh_score = s.score(&fresh, &kws, now());
        let aged_score = s.score(&aged, &kws, now());
        assert!((fresh_score - 0.65).abs() < 1e-9);
        assert!((aged_score - 0.575).abs() < 1e-6);
    }

    #[test]
    fn confidence_is_monotone() {
        let s = scorer();
        let kws = vec!["bridge".to_string()];
        let mut prev = -1.0;
        for c in 0..=10u8 {
            let d = doc("Bridge", Some(c), 5, now());
            let score = s.score(&d, &kws, now());
            assert!(score > prev, "confidence {c} lowered the score");
            prev = score;
        }
    }

    #[test]
    fn sources_checked_is_monotone_with_diminishing_returns() {
        let s = scorer();
        let kws = vec!["bridge".to_string()];
        let at = |n: u32| s.score(&doc("Bridge", Some(5), n, now()), &kws, now());

        assert!(at(5) > at(0));
        assert!(at(15) > at(5));
        // Saturates at 15 corroborating sources
        assert_eq!(at(15), at(30));
    }

    #[test]
    fn missing_confidence_scores_as_zero_confidence() {
        let s = scorer();
        let kws = vec!["bridge".to_string()];
        let missing = s.score(&doc("Bridge", None, 5, now()), &kws, now());
        let zero = s.score(&doc("Bridge", Some(0), 5, now()), &kws, now());
        assert_eq!(missing, zero);
        assert!(missing > 0.0); // defaulted, not rejected
    }

    #[test]
    fn scoring_is_deterministic() {
        let s = scorer();
        let d = doc("Bridge Integration", Some(7), 9, now() - Duration::days(42));
        let kws = vec!["bridge".to_string()];
        let a = s.score(&d, &kws, now());
        let b = s.score(&d, &kws, now());
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn future_verification_does_not_boost_past_fresh() {
        let s = scorer();
        let kws = vec!["bridge".to_string()];
        // Clock skew: last_verified slightly ahead of now. Age clamps to 0.
        let skewed = doc("Bridge", Some(5), 5, now() + Duration::hours(2));
        let fresh = doc("Bridge", Some(5), 5, now());
        assert_eq!(s.score(&skewed, &kws, now()), s.score(&fresh, &kws, now()));
    }
}
