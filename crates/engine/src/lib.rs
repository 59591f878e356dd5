//! The Packloom retrieval pipeline.
//!
//! Turns a pool of candidate knowledge documents into a byte-budgeted
//! context payload through four stages:
//!
//! 1. **Fetch** — candidate versions from the document store (the only
//!    await point; everything after it is pure computation)
//! 2. **Score** — topical match gated trust/freshness weighting
//! 3. **Dedup & staleness** — one current version per subject, stale
//!    survivors flagged and deprioritized rather than dropped
//! 4. **Pack** — greedy-with-skip byte knapsack with an explicit
//!    separator convention and a full exclusion report
//!
//! The pipeline is stateless per request: the caller passes an explicit
//! `now`, and identical inputs always produce byte-identical output.

pub mod context;
pub mod dedup;
pub mod packer;
pub mod pipeline;
pub mod scorer;

pub use context::{
    AssembledContext, ContextMetadata, Exclusion, ExclusionReason, IncludedDocument,
    ScoredCandidate,
};
pub use packer::ContextPacker;
pub use pipeline::ContextEngine;
pub use scorer::RelevanceScorer;
