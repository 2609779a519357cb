// src/score.rs
//! Rank scoring: recency and popularity blended by configured weights, plus
//! a small capped bonus for distinct keyword hits.
//!
//! `score` is pure, monotonic in both recency and popularity, and always a
//! finite value in [0,1]. A missing popularity signal contributes the
//! minimum (0.0), never an error.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::item::CandidateItem;
use crate::relevance::KeywordMatcher;

/// Relative weights for the two scored signals. Normalized by their sum at
/// scoring time, so only the ratio matters.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct ScoreWeights {
    pub recency: f32,
    pub popularity: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            recency: 0.6,
            popularity: 0.4,
        }
    }
}

/// Each distinct keyword hit adds this much, capped at
/// `KEYWORD_BONUS_CAP`. Small on purpose: it separates ties, it does not
/// outrank recency.
const KEYWORD_BONUS_STEP: f32 = 0.02;
const KEYWORD_BONUS_CAP: f32 = 0.10;

#[derive(Debug)]
pub struct RankScorer<'a> {
    weights: ScoreWeights,
    window_secs: u64,
    matcher: &'a KeywordMatcher,
}

impl<'a> RankScorer<'a> {
    pub fn new(weights: ScoreWeights, window_secs: u64, matcher: &'a KeywordMatcher) -> Self {
        Self {
            weights,
            window_secs,
            matcher,
        }
    }

    pub fn score(&self, item: &CandidateItem, now_unix: u64) -> f32 {
        let recency = recency_signal(now_unix, item.published_at, self.window_secs);
        let pop = popularity_signal(item.popularity);
        let denom = (self.weights.recency + self.weights.popularity).max(1e-6);
        let base = (recency * self.weights.recency + pop * self.weights.popularity) / denom;
        let bonus = keyword_bonus(self.matcher.match_count(&item.text()));
        (base + bonus).clamp(0.0, 1.0)
    }
}

/// Linear decay from 1.0 at age zero to 0.0 at the window end. Future
/// timestamps clamp to full weight; feed clocks skew routinely.
fn recency_signal(now_unix: u64, published_at: u64, window_secs: u64) -> f32 {
    let age = now_unix.saturating_sub(published_at);
    let window = window_secs.max(1);
    ((window.saturating_sub(age)) as f32 / window as f32).clamp(0.0, 1.0)
}

/// Saturating `p / (p + 1)` normalization: monotonic, bounded, and indifferent
/// to whatever unit the source counts in. Missing or junk signals (NaN,
/// negative) contribute the minimum.
fn popularity_signal(popularity: Option<f32>) -> f32 {
    match popularity {
        Some(p) if p.is_finite() && p > 0.0 => p / (p + 1.0),
        _ => 0.0,
    }
}

fn keyword_bonus(distinct_hits: usize) -> f32 {
    (distinct_hits as f32 * KEYWORD_BONUS_STEP).min(KEYWORD_BONUS_CAP)
}

/// The full ordering key for one item: score descending, then recency
/// descending, then configured source priority, then id ascending. Total and
/// deterministic for any valid item (scores are guaranteed finite).
#[derive(Debug, Clone, PartialEq)]
pub struct RankKey {
    pub score: f32,
    pub published_at: u64,
    pub source_rank: usize,
    pub id: String,
}

impl RankKey {
    /// Ordering that puts the best item first when used with `sort_by`.
    pub fn cmp_desc(&self, other: &Self) -> Ordering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.published_at.cmp(&self.published_at))
            .then_with(|| self.source_rank.cmp(&other.source_rank))
            .then_with(|| self.id.cmp(&other.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 24 * 3600;
    const WEEK: u64 = 7 * DAY;

    fn matcher() -> KeywordMatcher {
        KeywordMatcher::new(&["AI", "GPT", "model"]).unwrap()
    }

    fn item(published_at: u64, popularity: Option<f32>, title: &str) -> CandidateItem {
        CandidateItem {
            id: "x".into(),
            title: title.into(),
            summary: String::new(),
            source: "Test".into(),
            published_at,
            popularity,
            fetched_at: published_at,
        }
    }

    #[test]
    fn newer_scores_higher() {
        let m = matcher();
        let s = RankScorer::new(ScoreWeights::default(), WEEK, &m);
        let now = 10 * WEEK;
        let fresh = s.score(&item(now - DAY, None, "plain text"), now);
        let stale = s.score(&item(now - 5 * DAY, None, "plain text"), now);
        assert!(fresh > stale);
    }

    #[test]
    fn more_popular_scores_higher_and_missing_is_minimum() {
        let m = matcher();
        let s = RankScorer::new(ScoreWeights::default(), WEEK, &m);
        let now = 10 * WEEK;
        let hot = s.score(&item(now - DAY, Some(500.0), "plain text"), now);
        let warm = s.score(&item(now - DAY, Some(5.0), "plain text"), now);
        let none = s.score(&item(now - DAY, None, "plain text"), now);
        assert!(hot > warm);
        assert!(warm > none);
    }

    #[test]
    fn junk_popularity_never_produces_nan() {
        let m = matcher();
        let s = RankScorer::new(ScoreWeights::default(), WEEK, &m);
        let now = 10 * WEEK;
        for p in [Some(f32::NAN), Some(f32::INFINITY), Some(-3.0), None] {
            let v = s.score(&item(now, p, "plain text"), now);
            assert!(v.is_finite());
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn future_timestamp_clamps_to_full_recency() {
        let now = 10 * WEEK;
        assert!((recency_signal(now, now + DAY, WEEK) - 1.0).abs() < 1e-6);
        assert!((recency_signal(now, now, WEEK) - 1.0).abs() < 1e-6);
        assert_eq!(recency_signal(now, now - 2 * WEEK, WEEK), 0.0);
    }

    #[test]
    fn keyword_bonus_is_capped() {
        assert!((keyword_bonus(2) - 0.04).abs() < 1e-6);
        assert!((keyword_bonus(50) - 0.10).abs() < 1e-6);
        assert_eq!(keyword_bonus(0), 0.0);
    }

    #[test]
    fn keyword_hits_separate_equal_items() {
        let m = matcher();
        let s = RankScorer::new(ScoreWeights::default(), WEEK, &m);
        let now = 10 * WEEK;
        let with_kw = s.score(&item(now - DAY, None, "New AI model from a lab"), now);
        let without = s.score(&item(now - DAY, None, "New release from a lab"), now);
        assert!(with_kw > without);
    }

    #[test]
    fn rank_key_full_tiebreak_chain() {
        let base = RankKey {
            score: 0.5,
            published_at: 100,
            source_rank: 1,
            id: "b".into(),
        };
        // Higher score first.
        let better = RankKey {
            score: 0.6,
            ..base.clone()
        };
        assert_eq!(better.cmp_desc(&base), Ordering::Less);
        // Equal score: newer first.
        let newer = RankKey {
            published_at: 200,
            ..base.clone()
        };
        assert_eq!(newer.cmp_desc(&base), Ordering::Less);
        // Equal score+time: better source rank first.
        let preferred = RankKey {
            source_rank: 0,
            ..base.clone()
        };
        assert_eq!(preferred.cmp_desc(&base), Ordering::Less);
        // Full tie: id ascending.
        let earlier_id = RankKey {
            id: "a".into(),
            ..base.clone()
        };
        assert_eq!(earlier_id.cmp_desc(&base), Ordering::Less);
        assert_eq!(base.cmp_desc(&base), Ordering::Equal);
    }
}
