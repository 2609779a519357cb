// src/sources.rs
//! Source priority: the configured ordering of source names, used as a
//! tie-break when score and recency are equal. Earlier in the list wins.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct SourcePriority {
    ranks: HashMap<String, usize>,
}

impl SourcePriority {
    pub fn new<I, S>(ordered: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ranks = HashMap::new();
        for (i, name) in ordered.into_iter().enumerate() {
            let key = normalize(name.as_ref());
            if key.is_empty() {
                continue;
            }
            // First occurrence wins on duplicate config entries.
            ranks.entry(key).or_insert(i);
        }
        Self { ranks }
    }

    /// Rank for a source name; lower is higher priority. Sources absent from
    /// the configured list all rank after the configured ones.
    pub fn rank(&self, source: &str) -> usize {
        let key = normalize(source);
        *self.ranks.get(&key).unwrap_or(&self.ranks.len())
    }
}

/// Lowercase, separators and punctuation to spaces, collapse runs. Keeps
/// "TechCrunch-AI" and "techcrunch ai" on the same rank.
fn normalize(s: &str) -> String {
    let mut out = s.trim().to_ascii_lowercase();
    for ch in ['—', '–', '-', '_', '/', '\\'] {
        out = out.replace(ch, " ");
    }
    out = out.replace(['\n', '\r', '\t', '.', ',', '\''], " ");
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
