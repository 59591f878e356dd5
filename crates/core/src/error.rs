//! Error types for the Packloom domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Only two errors are
//! fatal to a request: an unknown pack, and a budget too small to hold any
//! output. Everything per-document is absorbed, defaulted, and annotated.

use crate::store::StoreError;
use thiserror::Error;

/// The top-level error type for all Packloom operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested pack does not exist in the document store.
    #[error("Pack not found: {0}")]
    PackNotFound(String),

    /// The byte budget cannot hold the separator plus any content.
    #[error("Budget too small: {budget_bytes} bytes (minimum viable: {min_bytes})")]
    BudgetTooSmall { budget_bytes: usize, min_bytes: usize },

    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(StoreError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        // PackNotFound is caller-visible taxonomy, not a store fault.
        match err {
            StoreError::PackNotFound(pack) => Error::PackNotFound(pack),
            other => Error::Store(other),
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_not_found_displays_pack_name() {
        let err = Error::PackNotFound("solana".into());
        assert!(err.to_string().contains("solana"));
    }

    #[test]
    fn store_pack_not_found_promotes_to_top_level() {
        let err: Error = StoreError::PackNotFound("anchor".into()).into();
        assert!(matches!(err, Error::PackNotFound(p) if p == "anchor"));
    }

    #[test]
    fn other_store_errors_stay_wrapped() {
        let err: Error = StoreError::Storage("disk gone".into()).into();
        assert!(matches!(err, Error::Store(_)));
        assert!(err.to_string().contains("disk gone"));
    }

    #[test]
    fn budget_too_small_displays_both_sizes() {
        let err = Error::BudgetTooSmall { budget_bytes: 3, min_bytes: 42 };
        let msg = err.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains("42"));
    }
}
