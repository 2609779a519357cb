// src/pipeline.rs
//! Curation pipeline: one batch in, one ordered capped list out.
//!
//! Stages, in order: validate -> fingerprint dedup -> relevance filter ->
//! similarity grouping -> score + sort -> truncate. A pipeline value holds
//! only compiled config; every `run` starts fresh, the only cross-run state
//! lives behind the external fingerprint store.

use std::collections::HashMap;

use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::config::CurationConfig;
use crate::error::CurateError;
use crate::fingerprint::FingerprintStore;
use crate::item::{CandidateItem, ScoredItem};
use crate::relevance::KeywordMatcher;
use crate::score::{RankKey, RankScorer};
use crate::similarity;
use crate::sources::SourcePriority;

/// One-time metrics registration (so series show up on the embedder's
/// exporter).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("curate_candidates_total", "Candidates entering the pipeline.");
        describe_counter!("curate_selected_total", "Items emitted after truncation.");
        describe_counter!(
            "curate_malformed_total",
            "Candidates skipped for missing id/text."
        );
        describe_counter!(
            "curate_seen_total",
            "Candidates dropped by the fingerprint store."
        );
        describe_counter!(
            "curate_irrelevant_total",
            "Candidates dropped by the keyword gate."
        );
        describe_counter!(
            "curate_duplicate_total",
            "Candidates dropped as intra-batch near-duplicates."
        );
        describe_gauge!("curate_last_run_ts", "Unix ts when curation last ran.");
    });
}

/// Result of one run: the ordered selection plus per-stage drop counts in
/// the order the stages ran.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurationOutcome {
    pub items: Vec<CandidateItem>,
    pub skipped_malformed: usize,
    pub dropped_seen: usize,
    pub dropped_irrelevant: usize,
    pub dropped_duplicate: usize,
}

#[derive(Debug)]
pub struct CurationPipeline {
    config: CurationConfig,
    matcher: KeywordMatcher,
    priority: SourcePriority,
}

impl CurationPipeline {
    /// Validates the config and compiles the keyword pattern; a pipeline
    /// that constructs is a pipeline that can run.
    pub fn new(config: CurationConfig) -> Result<Self, CurateError> {
        config.validate()?;
        let matcher = KeywordMatcher::new(&config.relevance_keywords)?;
        let priority = SourcePriority::new(config.source_priority.iter());
        Ok(Self {
            config,
            matcher,
            priority,
        })
    }

    pub fn config(&self) -> &CurationConfig {
        &self.config
    }

    /// Curate one batch. `now_unix` is passed in rather than sampled so runs
    /// are reproducible; callers use the fetch clock.
    ///
    /// Malformed candidates are skipped and counted. A store failure aborts
    /// the whole run before any output is assembled.
    pub async fn run(
        &self,
        store: &dyn FingerprintStore,
        candidates: Vec<CandidateItem>,
        now_unix: u64,
    ) -> Result<CurationOutcome, CurateError> {
        ensure_metrics_described();
        let total = candidates.len();
        let mut outcome = CurationOutcome::default();

        // Validate.
        let mut valid = Vec::with_capacity(total);
        for item in candidates {
            if let Some(reason) = item.malformed_reason() {
                warn!(id = %item.id, reason, "skipping malformed candidate");
                outcome.skipped_malformed += 1;
                continue;
            }
            valid.push(item);
        }

        // Fingerprint dedup. The `?` aborts on store failure before any
        // similarity work happens, per the fail-fast contract.
        let mut fresh = Vec::with_capacity(valid.len());
        for item in valid {
            if store.exists(&item.id).await? {
                outcome.dropped_seen += 1;
                continue;
            }
            fresh.push(item);
        }

        // Relevance.
        let mut kept: Vec<ScoredItem> = fresh
            .into_iter()
            .map(|item| ScoredItem {
                relevant: self.matcher.is_relevant(&item),
                group: 0,
                score: 0.0,
                item,
            })
            .collect();
        let before = kept.len();
        kept.retain(|s| s.relevant);
        outcome.dropped_irrelevant = before - kept.len();

        // Similarity grouping; one representative survives per group.
        let groups = similarity::group_items(
            kept.iter().map(|s| &s.item),
            self.config.similarity_threshold,
        );
        for (s, g) in kept.iter_mut().zip(&groups) {
            s.group = *g;
        }
        let before = kept.len();
        kept = self.keep_representatives(kept);
        outcome.dropped_duplicate = before - kept.len();

        // Score, sort, truncate.
        let scorer = RankScorer::new(
            self.config.score_weights,
            self.config.recency_window_secs,
            &self.matcher,
        );
        let mut ranked: Vec<(RankKey, CandidateItem)> = kept
            .into_iter()
            .map(|mut s| {
                s.score = scorer.score(&s.item, now_unix);
                let key = RankKey {
                    score: s.score,
                    published_at: s.item.published_at,
                    source_rank: self.priority.rank(&s.item.source),
                    id: s.item.id.clone(),
                };
                (key, s.item)
            })
            .collect();
        ranked.sort_by(|a, b| a.0.cmp_desc(&b.0));
        ranked.truncate(self.config.max_articles);
        outcome.items = ranked.into_iter().map(|(_, item)| item).collect();

        counter!("curate_candidates_total").increment(total as u64);
        counter!("curate_selected_total").increment(outcome.items.len() as u64);
        counter!("curate_malformed_total").increment(outcome.skipped_malformed as u64);
        counter!("curate_seen_total").increment(outcome.dropped_seen as u64);
        counter!("curate_irrelevant_total").increment(outcome.dropped_irrelevant as u64);
        counter!("curate_duplicate_total").increment(outcome.dropped_duplicate as u64);
        gauge!("curate_last_run_ts").set(now_unix as f64);

        info!(
            total,
            selected = outcome.items.len(),
            malformed = outcome.skipped_malformed,
            seen = outcome.dropped_seen,
            irrelevant = outcome.dropped_irrelevant,
            duplicate = outcome.dropped_duplicate,
            "curation run complete"
        );

        Ok(outcome)
    }

    /// Keep one item per similarity group: newest first, then highest
    /// popularity, then source priority, then smallest id. Output preserves
    /// the batch order of the winners.
    fn keep_representatives(&self, items: Vec<ScoredItem>) -> Vec<ScoredItem> {
        let mut best_by_group: HashMap<usize, usize> = HashMap::new();
        for (idx, s) in items.iter().enumerate() {
            match best_by_group.get(&s.group) {
                None => {
                    best_by_group.insert(s.group, idx);
                }
                Some(&cur) => {
                    if self.beats(&s.item, &items[cur].item) {
                        best_by_group.insert(s.group, idx);
                    }
                }
            }
        }
        items
            .into_iter()
            .enumerate()
            .filter(|(idx, s)| best_by_group.get(&s.group) == Some(idx))
            .map(|(_, s)| s)
            .collect()
    }

    /// True if `a` should represent a group over `b`. Missing popularity
    /// loses to any present signal.
    fn beats(&self, a: &CandidateItem, b: &CandidateItem) -> bool {
        if a.published_at != b.published_at {
            return a.published_at > b.published_at;
        }
        let pa = a.popularity.unwrap_or(f32::NEG_INFINITY);
        let pb = b.popularity.unwrap_or(f32::NEG_INFINITY);
        if pa != pb {
            return pa > pb;
        }
        let (ra, rb) = (self.priority.rank(&a.source), self.priority.rank(&b.source));
        if ra != rb {
            return ra < rb;
        }
        a.id < b.id
    }
}
