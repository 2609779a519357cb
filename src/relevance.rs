// src/relevance.rs
//! Keyword relevance gate.
//!
//! Matching rule (fixed — everything downstream depends on it): an item is
//! relevant iff at least one configured keyword occurs as a whole word,
//! case-insensitively, anywhere in `title + " " + summary`. Keywords are
//! matched literally (regex-escaped), so "C++" or "DALL-E" are safe.

use std::collections::HashSet;

use regex::Regex;

use crate::error::CurateError;
use crate::item::CandidateItem;

#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    pattern: Regex,
}

impl KeywordMatcher {
    /// Compile the keyword set into a single alternation. An empty set is a
    /// config error: it would silently drop every item.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, CurateError> {
        let escaped: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect();
        if escaped.is_empty() {
            return Err(CurateError::InvalidConfig(
                "relevance_keywords must contain at least one keyword".into(),
            ));
        }
        let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", escaped.join("|")))
            .map_err(|e| CurateError::InvalidConfig(format!("keyword pattern: {e}")))?;
        Ok(Self { pattern })
    }

    pub fn is_relevant(&self, item: &CandidateItem) -> bool {
        self.is_match(&item.text())
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Number of *distinct* keywords hit in `text` (case-folded). Feeds the
    /// scorer's keyword bonus.
    pub fn match_count(&self, text: &str) -> usize {
        let mut seen: HashSet<String> = HashSet::new();
        for m in self.pattern.find_iter(text) {
            seen.insert(m.as_str().to_lowercase());
        }
        seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> KeywordMatcher {
        KeywordMatcher::new(&["AI", "machine learning", "GPT", "DALL-E"]).unwrap()
    }

    fn item(title: &str, summary: &str) -> CandidateItem {
        CandidateItem {
            id: "x".into(),
            title: title.into(),
            summary: summary.into(),
            source: "Test".into(),
            published_at: 0,
            popularity: None,
            fetched_at: 0,
        }
    }

    #[test]
    fn whole_word_case_insensitive() {
        let m = matcher();
        assert!(m.is_match("New ai breakthrough"));
        assert!(m.is_match("Advances in Machine Learning today"));
        // "AI" inside another word must not match.
        assert!(!m.is_match("maintain a good pace"));
        assert!(!m.is_match("nothing to see here"));
    }

    #[test]
    fn keyword_with_punctuation_matches_literally() {
        let m = matcher();
        assert!(m.is_match("dall-e makes images"));
    }

    #[test]
    fn relevance_checks_title_and_summary() {
        let m = matcher();
        assert!(m.is_relevant(&item("Boring title", "but GPT is mentioned")));
        assert!(m.is_relevant(&item("AI wins again", "")));
        assert!(!m.is_relevant(&item("Apple ships laptop", "with a new chip")));
    }

    #[test]
    fn match_count_is_distinct() {
        let m = matcher();
        assert_eq!(m.match_count("AI and ai and more AI"), 1);
        assert_eq!(m.match_count("AI meets GPT via machine learning"), 3);
        assert_eq!(m.match_count("no hits"), 0);
    }

    #[test]
    fn empty_keyword_set_is_rejected() {
        let err = KeywordMatcher::new(&[" ", ""]).unwrap_err();
        assert!(matches!(err, CurateError::InvalidConfig(_)));
    }
}
