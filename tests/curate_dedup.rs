// tests/curate_dedup.rs
use ai_news_curator::{CandidateItem, CurationConfig, CurationPipeline, MemoryStore};

const NOW: u64 = 1_800_000_000;

fn item(id: &str, title: &str) -> CandidateItem {
    CandidateItem {
        id: id.into(),
        title: title.into(),
        summary: "Notes on AI tooling.".into(),
        source: "Feed".into(),
        published_at: NOW - 600,
        popularity: None,
        fetched_at: NOW,
    }
}

fn pipeline() -> CurationPipeline {
    CurationPipeline::new(CurationConfig {
        relevance_keywords: vec!["AI".into()],
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn seen_ids_are_dropped_before_any_other_stage() {
    let store = MemoryStore::with_ids(["https://example.com/one"]);
    let batch = vec![
        item("https://example.com/one", "AI item already produced"),
        item("https://example.com/two", "Fresh AI coverage this morning"),
    ];
    let out = pipeline().run(&store, batch, NOW).await.unwrap();
    assert_eq!(out.dropped_seen, 1);
    assert_eq!(out.items.len(), 1);
    assert_eq!(out.items[0].id, "https://example.com/two");
}

#[tokio::test]
async fn malformed_items_are_skipped_not_fatal() {
    let store = MemoryStore::new();
    let no_id = CandidateItem {
        id: "  ".into(),
        ..item("ignored", "AI headline with no usable id")
    };
    let no_text = CandidateItem {
        title: String::new(),
        summary: "   ".into(),
        ..item("https://example.com/empty", "")
    };
    let ok = item("https://example.com/ok", "AI assistants reviewed in depth");
    let out = pipeline()
        .run(&store, vec![no_id, no_text, ok], NOW)
        .await
        .unwrap();
    assert_eq!(out.skipped_malformed, 2);
    assert_eq!(out.items.len(), 1);
    assert_eq!(out.items[0].id, "https://example.com/ok");
}

#[tokio::test]
async fn empty_batch_is_a_clean_no_op() {
    let store = MemoryStore::new();
    let out = pipeline().run(&store, Vec::new(), NOW).await.unwrap();
    assert!(out.items.is_empty());
    assert_eq!(out.skipped_malformed, 0);
    assert_eq!(out.dropped_seen, 0);
}
