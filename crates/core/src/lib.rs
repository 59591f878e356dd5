//! # Packloom Core
//!
//! Domain types, traits, and error definitions for the Packloom knowledge
//! pack retrieval engine. This crate has **zero framework dependencies** —
//! it defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is defined as a trait here: the document
//! store and the topical matcher both have pluggable implementations that
//! live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with in-memory stubs
//! - Clean dependency graph (all crates depend inward on core)

pub mod document;
pub mod error;
pub mod matcher;
pub mod query;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use document::{Document, derive_id, normalize_slug};
pub use error::{Error, Result};
pub use matcher::{KeywordMatcher, TopicMatcher, tokenize};
pub use query::Query;
pub use store::{DocumentStore, PackInfo, StoreError};
