// src/lib.rs
// Public library surface for integration tests and the digest application.

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod item;
pub mod pipeline;
pub mod relevance;
pub mod score;
pub mod similarity;
pub mod sources;

// ---- Re-exports for stable public API ----
pub use crate::config::CurationConfig;
pub use crate::error::{CurateError, StoreError};
pub use crate::fingerprint::{content_fingerprint, FingerprintStore, MemoryStore};
pub use crate::item::CandidateItem;
pub use crate::pipeline::{CurationOutcome, CurationPipeline};
pub use crate::score::ScoreWeights;
