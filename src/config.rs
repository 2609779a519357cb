// src/config.rs
//! Immutable per-run configuration.
//!
//! Constructed once (file, env override, or defaults), validated up front,
//! then passed down by reference — nothing mutates it mid-run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::error::CurateError;
use crate::score::ScoreWeights;

pub const DEFAULT_CONFIG_PATH: &str = "config/curator.toml";
pub const DEFAULT_CONFIG_PATH_JSON: &str = "config/curator.json";
pub const ENV_CONFIG_PATH: &str = "CURATOR_CONFIG_PATH";

pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.80;
pub const DEFAULT_MAX_ARTICLES: usize = 5;
pub const DEFAULT_RECENCY_WINDOW_SECS: u64 = 7 * 24 * 3600;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CurationConfig {
    /// Topical keyword set for the relevance gate. Must be non-empty.
    #[serde(default = "default_keywords")]
    pub relevance_keywords: Vec<String>,

    /// Pairwise similarity at or above this groups items as duplicates.
    /// Must lie in (0, 1]. Kept conservative by default: under-merging
    /// shows a reader two similar stories, over-merging silently drops one.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Upper bound on emitted items. Zero is valid and yields empty output.
    /// (Unsigned by construction, so "negative max" cannot be expressed.)
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,

    #[serde(default)]
    pub score_weights: ScoreWeights,

    /// Source names in priority order, used only as a tie-break.
    #[serde(default)]
    pub source_priority: Vec<String>,

    /// Age at which the recency signal reaches zero.
    #[serde(default = "default_recency_window")]
    pub recency_window_secs: u64,
}

fn default_similarity_threshold() -> f32 {
    DEFAULT_SIMILARITY_THRESHOLD
}

fn default_max_articles() -> usize {
    DEFAULT_MAX_ARTICLES
}

fn default_recency_window() -> u64 {
    DEFAULT_RECENCY_WINDOW_SECS
}

fn default_keywords() -> Vec<String> {
    [
        "AI",
        "artificial intelligence",
        "machine learning",
        "deep learning",
        "neural network",
        "GPT",
        "ChatGPT",
        "LLM",
        "large language model",
        "generative AI",
        "OpenAI",
        "DeepMind",
        "Anthropic",
        "Claude",
        "Gemini",
        "Llama",
        "computer vision",
        "NLP",
        "natural language processing",
        "reinforcement learning",
        "speech recognition",
        "DALL-E",
        "Midjourney",
        "Stable Diffusion",
        "multimodal",
        "AGI",
        "transformer",
        "fine-tuning",
        "prompt engineering",
        "RAG",
        "vector database",
        "embedding",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            relevance_keywords: default_keywords(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_articles: DEFAULT_MAX_ARTICLES,
            score_weights: ScoreWeights::default(),
            source_priority: Vec::new(),
            recency_window_secs: DEFAULT_RECENCY_WINDOW_SECS,
        }
    }
}

impl CurationConfig {
    /// Load from an explicit file. TOML by default, JSON when the extension
    /// says so.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading curator config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg: Self = if ext == "json" {
            serde_json::from_str(&content)
                .with_context(|| format!("parsing curator config from {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("parsing curator config from {}", path.display()))?
        };
        Ok(cfg)
    }

    /// Load using env var + fallbacks:
    /// 1) $CURATOR_CONFIG_PATH
    /// 2) config/curator.toml
    /// 3) config/curator.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("CURATOR_CONFIG_PATH points to non-existent path"));
        }
        for candidate in [DEFAULT_CONFIG_PATH, DEFAULT_CONFIG_PATH_JSON] {
            let pb = PathBuf::from(candidate);
            if pb.exists() {
                return Self::load_from(&pb);
            }
        }
        Ok(Self::default())
    }

    /// Reject configs the pipeline must not run with. Fatal at startup.
    pub fn validate(&self) -> Result<(), CurateError> {
        if !self.relevance_keywords.iter().any(|k| !k.trim().is_empty()) {
            return Err(CurateError::InvalidConfig(
                "relevance_keywords must contain at least one keyword".into(),
            ));
        }
        let t = self.similarity_threshold;
        if !t.is_finite() || t <= 0.0 || t > 1.0 {
            return Err(CurateError::InvalidConfig(format!(
                "similarity_threshold must lie in (0, 1], got {t}"
            )));
        }
        let w = &self.score_weights;
        if !w.recency.is_finite() || !w.popularity.is_finite() {
            return Err(CurateError::InvalidConfig(
                "score_weights must be finite".into(),
            ));
        }
        if w.recency < 0.0 || w.popularity < 0.0 {
            return Err(CurateError::InvalidConfig(
                "score_weights must be non-negative".into(),
            ));
        }
        if w.recency + w.popularity <= 0.0 {
            return Err(CurateError::InvalidConfig(
                "score_weights must not both be zero".into(),
            ));
        }
        if self.recency_window_secs == 0 {
            return Err(CurateError::InvalidConfig(
                "recency_window_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}
