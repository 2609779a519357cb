// src/item.rs
//! Candidate item model shared by the fetch collaborators and the pipeline.

use serde::{Deserialize, Serialize};

/// One fetched news item. Immutable within a run; the fetchers build these,
/// the pipeline only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateItem {
    /// Stable external identifier — feed guid or canonical URL.
    pub id: String,
    pub title: String,
    pub summary: String,
    /// Source name as configured, e.g. "TechCrunch AI".
    pub source: String,
    /// Unix seconds.
    pub published_at: u64,
    /// Source-defined popularity signal (upvotes, shares…). Sources that
    /// have no such signal leave it out.
    pub popularity: Option<f32>,
    /// Unix seconds at fetch time.
    pub fetched_at: u64,
}

impl CandidateItem {
    /// Why this item cannot be curated, if anything. An item without an id
    /// cannot be deduplicated; one with no text at all cannot be matched or
    /// compared. Such items are skipped, not fatal.
    pub fn malformed_reason(&self) -> Option<&'static str> {
        if self.id.trim().is_empty() {
            return Some("empty id");
        }
        if self.title.trim().is_empty() && self.summary.trim().is_empty() {
            return Some("no title or summary text");
        }
        None
    }

    /// Title and summary joined for text-level checks.
    pub fn text(&self) -> String {
        let title = self.title.trim();
        let summary = self.summary.trim();
        if title.is_empty() {
            return summary.to_string();
        }
        if summary.is_empty() {
            return title.to_string();
        }
        format!("{title} {summary}")
    }
}

/// Per-run wrapper carrying the computed curation signals. Recomputed every
/// run, never persisted; the pipeline unwraps back to `CandidateItem` before
/// emitting output.
#[derive(Debug, Clone)]
pub(crate) struct ScoredItem {
    pub item: CandidateItem,
    pub relevant: bool,
    pub group: usize,
    pub score: f32,
}
