//! Demo that curates a canned batch against an in-memory fingerprint store
//! and prints the selection. No network, no persistence.

use chrono::Utc;

use ai_news_curator::{CandidateItem, CurationConfig, CurationPipeline, MemoryStore};

fn sample(id: &str, title: &str, summary: &str, source: &str, age_secs: u64) -> CandidateItem {
    let now = Utc::now().timestamp().max(0) as u64;
    CandidateItem {
        id: format!("https://example.com/{id}"),
        title: title.into(),
        summary: summary.into(),
        source: source.into(),
        published_at: now - age_secs,
        popularity: None,
        fetched_at: now,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = CurationConfig::load_default()?;
    let pipeline = CurationPipeline::new(config)?;

    // One already-produced story, one duplicate pair, one off-topic item.
    let store = MemoryStore::with_ids(["https://example.com/already-covered"]);
    let batch = vec![
        sample(
            "gpt5-launch",
            "OpenAI releases GPT-5",
            "The new flagship large language model is rolling out this week.",
            "OpenAI Blog",
            3_600,
        ),
        sample(
            "gpt5-launch-tc",
            "OpenAI releases GPT-5 now",
            "The new flagship large language model is rolling out, OpenAI says.",
            "TechCrunch AI",
            7_200,
        ),
        sample(
            "already-covered",
            "Anthropic updates Claude",
            "A new Claude release with longer context.",
            "Hacker News",
            1_800,
        ),
        sample(
            "laptop",
            "New laptop announced",
            "A thinner chassis and a bigger battery.",
            "Hacker News",
            600,
        ),
    ];

    let now = Utc::now().timestamp().max(0) as u64;
    let outcome = pipeline.run(&store, batch, now).await?;

    println!(
        "selected {} item(s); seen={} irrelevant={} duplicate={}",
        outcome.items.len(),
        outcome.dropped_seen,
        outcome.dropped_irrelevant,
        outcome.dropped_duplicate
    );
    for (i, item) in outcome.items.iter().enumerate() {
        println!("{}. [{}] {}", i + 1, item.source, item.title);
    }

    Ok(())
}
