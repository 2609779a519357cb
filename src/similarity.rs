// src/similarity.rs
//! Intra-batch near-duplicate detection.
//!
//! Pair similarity is the max of two channels, each in [0,1], symmetric and
//! reflexive:
//! - normalized Levenshtein over normalized titles, which catches the same
//!   headline syndicated with small edits;
//! - term-frequency cosine over title+summary tokens, which catches
//!   body-level near-copies under different headlines.
//!
//! Grouping is connected components over the "similarity >= threshold"
//! graph via union-find: membership is transitive (A~B and B~C put A and C
//! in one group) and independent of comparison order.

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::item::CandidateItem;

fn re_tags() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"))
}

fn re_nonword() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?u)[^\w]+").expect("nonword regex"))
}

/// Entity-decoded, tag-free, lowercased text with punctuation collapsed to
/// single spaces. Feed summaries routinely carry HTML fragments.
pub fn normalize(text: &str) -> String {
    let decoded = html_escape::decode_html_entities(text);
    let no_tags = re_tags().replace_all(&decoded, " ");
    let lowered = no_tags.to_lowercase();
    let spaced = re_nonword().replace_all(&lowered, " ");
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Raw term-frequency vector over whitespace tokens of normalized text.
fn tf_vector(normalized: &str) -> HashMap<String, f32> {
    let mut v: HashMap<String, f32> = HashMap::new();
    for tok in normalized.split_whitespace() {
        *v.entry(tok.to_string()).or_insert(0.0) += 1.0;
    }
    v
}

fn cosine(a: &HashMap<String, f32>, b: &HashMap<String, f32>) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut dot = 0.0f32;
    for (tok, x) in small {
        if let Some(y) = large.get(tok) {
            dot += x * y;
        }
    }
    let na: f32 = a.values().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.values().map(|x| x * x).sum::<f32>().sqrt();
    let denom = na * nb;
    if denom <= 0.0 {
        0.0
    } else {
        (dot / denom).clamp(0.0, 1.0)
    }
}

/// Precomputed comparison inputs for one item.
struct Profile {
    title: String,
    vector: HashMap<String, f32>,
}

impl Profile {
    fn of(item: &CandidateItem) -> Self {
        Self {
            title: normalize(&item.title),
            vector: tf_vector(&normalize(&item.text())),
        }
    }
}

fn profile_similarity(a: &Profile, b: &Profile) -> f32 {
    let title_sim = if a.title.is_empty() || b.title.is_empty() {
        0.0
    } else {
        strsim::normalized_levenshtein(&a.title, &b.title) as f32
    };
    let body_sim = cosine(&a.vector, &b.vector);
    title_sim.max(body_sim)
}

/// Similarity of one pair as used by grouping. In [0,1]; an item with any
/// text compared to itself yields 1.0.
pub fn pair_similarity(a: &CandidateItem, b: &CandidateItem) -> f32 {
    profile_similarity(&Profile::of(a), &Profile::of(b))
}

/// Union-find with path halving; no rank, batches are small.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Smaller root wins so group ids are stable across merge order.
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}

/// Dense group ids for `items`, numbered in first-seen order. Two items get
/// the same id iff they are connected through pairwise similarity at or
/// above `threshold`.
pub fn group_items<'a, I>(items: I, threshold: f32) -> Vec<usize>
where
    I: IntoIterator<Item = &'a CandidateItem>,
{
    let profiles: Vec<Profile> = items.into_iter().map(Profile::of).collect();
    let n = profiles.len();
    let mut uf = UnionFind::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            if profile_similarity(&profiles[i], &profiles[j]) >= threshold {
                uf.union(i, j);
            }
        }
    }

    let mut ids: HashMap<usize, usize> = HashMap::new();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let root = uf.find(i);
        let next = ids.len();
        out.push(*ids.entry(root).or_insert(next));
    }
    out
}
