// src/fingerprint.rs
//! Fingerprint store seam: "have we already produced an article for this
//! item?"
//!
//! The persistent store lives with the storage collaborator; this core only
//! consumes the contract. `exists` gates every candidate before any
//! similarity work, `record` is called by the generator after an article is
//! actually written (recording earlier would suppress a story forever if
//! generation failed).

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StoreError;

#[async_trait]
pub trait FingerprintStore: Send + Sync {
    /// True if the id was recorded by a previous run.
    async fn exists(&self, id: &str) -> Result<bool, StoreError>;

    /// Record an id as produced. Idempotent.
    async fn record(&self, id: &str) -> Result<(), StoreError>;
}

/// Short SHA-256 hex digest for callers that fingerprint content rather than
/// ids (scraped pages without a stable URL, for instance).
pub fn content_fingerprint(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(16);
    for b in digest.iter().take(8) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// In-process store for tests and the demo binary. Production runs use the
/// storage collaborator's SQLite-backed implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store, handy for tests.
    pub fn with_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: Mutex::new(ids.into_iter().map(Into::into).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("fingerprint mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FingerprintStore for MemoryStore {
    async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self
            .inner
            .lock()
            .expect("fingerprint mutex poisoned")
            .contains(id))
    }

    async fn record(&self, id: &str) -> Result<(), StoreError> {
        self.inner
            .lock()
            .expect("fingerprint mutex poisoned")
            .insert(id.to_string());
        Ok(())
    }
}
