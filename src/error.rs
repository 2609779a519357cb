// src/error.rs
//! Error taxonomy for the curation core.
//!
//! Only conditions the caller must react to are typed here: a rejected
//! configuration and a lost fingerprint store. Malformed candidates are
//! recoverable — the pipeline skips them with a warning and a counter,
//! they never surface as errors.

use thiserror::Error;

/// Failure talking to the fingerprint store. The backend (SQLite, files,
/// whatever the storage collaborator runs) is opaque to this core; we only
/// carry its message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

#[derive(Debug, Error)]
pub enum CurateError {
    /// Rejected at construction time; no run ever starts with a config in
    /// this state.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The fingerprint store could not answer an `exists` check. The run
    /// aborts with no partial output: treating everything as new would
    /// re-publish old stories, treating everything as seen would drop the
    /// whole batch.
    #[error("fingerprint store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_converts_to_fatal_variant() {
        let e: CurateError = StoreError::new("db locked").into();
        assert!(matches!(e, CurateError::StoreUnavailable(_)));
        assert!(e.to_string().contains("db locked"));
    }
}
