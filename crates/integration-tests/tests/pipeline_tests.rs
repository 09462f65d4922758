//! End-to-end pipeline tests: extraction, backend fan-out, cost estimation,
//! scoring, and ranking wired together over mock backends.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Allow for tests"
)]

use docjury_core::DocumentQuery;
use docjury_extract::DocumentCache;
use docjury_providers::MockBackend;
use docjury_ranking::{ModelPricing, PriceTable, Weights};

use integration_tests::{candidates_from_replies, gather_replies, score_and_rank};

fn price_table(entries: &[(&str, f64, f64)]) -> PriceTable {
    let mut table = PriceTable::new();
    for (model_id, input, output) in entries {
        table.insert(*model_id, ModelPricing::new(*input, *output));
    }
    table
}

#[tokio::test]
async fn test_extraction_feeds_prompt_to_backends() {
    let mut cache = DocumentCache::new();
    let document = cache
        .fetch_or_extract(b"The warranty lasts two years.", "txt")
        .expect("extraction failed")
        .to_owned();
    let query = DocumentQuery::new(document, "How long is the warranty?");

    let backend = MockBackend::new("m1").with_answer("Two years.");
    let replies = gather_replies(std::slice::from_ref(&backend), &query).await;

    assert_eq!(replies.len(), 1);
    let history = backend.call_history();
    assert!(history[0].contains("The warranty lasts two years."));
    assert!(history[0].contains("How long is the warranty?"));
}

#[tokio::test]
async fn test_composite_tie_breaks_by_submission_order() {
    // m1: lowest quality but fastest and cheapest. m2: the mirror image.
    // With weights (0.5, 0.3, 0.2) both land on composite 0.5.
    let backends = [
        MockBackend::new("m1")
            .with_latency_ms(2000)
            .with_tokens(10_000, 0),
        MockBackend::new("m2")
            .with_latency_ms(5000)
            .with_tokens(10_000, 0),
    ];
    let prices = price_table(&[("m1", 1.0, 0.0), ("m2", 20.0, 0.0)]);
    let query = DocumentQuery::new("doc", "q");

    let replies = gather_replies(&backends, &query).await;
    let candidates = candidates_from_replies(&replies, &[("m1", 1.0), ("m2", 4.0)], &prices);
    let result = score_and_rank(&candidates, Weights::new(0.5, 0.3, 0.2));

    assert_eq!(result.winner.as_deref(), Some("m1"));
    assert!((result.ranking[0].composite - 0.5).abs() < 1e-9);
    assert!((result.ranking[1].composite - 0.5).abs() < 1e-9);
    assert!(result.narrative.contains("ties with m2"));
}

#[tokio::test]
async fn test_failed_backend_excluded_without_aborting_run() {
    let backends = [
        MockBackend::new("m1").with_latency_ms(1000).with_tokens(100, 50),
        MockBackend::new("broken").failing(),
        MockBackend::new("m3").with_latency_ms(3000).with_tokens(100, 50),
    ];
    let prices = price_table(&[("m1", 1.0, 2.0), ("m3", 1.0, 2.0)]);
    let query = DocumentQuery::new("doc", "q");

    let replies = gather_replies(&backends, &query).await;
    assert_eq!(replies.len(), 2);

    let candidates = candidates_from_replies(
        &replies,
        &[("m1", 2.0), ("broken", 3.0), ("m3", 4.0)],
        &prices,
    );
    let result = score_and_rank(&candidates, Weights::default());

    assert_eq!(result.ranking.len(), 2);
    assert!(result.winner.is_some());
    assert!(!result.narrative.contains("broken"));
}

#[tokio::test]
async fn test_missing_usage_is_scored_as_cheapest() {
    // m1 reports no usage: its cost is forced to 0.0 and flagged unknown.
    // As the unique minimum it scores 1.0 on cost. That is the documented
    // approximation, asserted here on purpose.
    let backends = [
        MockBackend::new("m1").with_latency_ms(2000),
        MockBackend::new("m2").with_latency_ms(1000).with_tokens(1_000_000, 0),
    ];
    let prices = price_table(&[("m1", 1.0, 1.0), ("m2", 3.0, 3.0)]);
    let query = DocumentQuery::new("doc", "q");

    let replies = gather_replies(&backends, &query).await;
    let candidates = candidates_from_replies(&replies, &[("m1", 2.0), ("m2", 3.0)], &prices);

    let unknown = candidates
        .iter()
        .find(|candidate| candidate.id == "m1")
        .expect("m1 missing");
    assert!(!unknown.cost_known);
    assert!(unknown.cost_usd.abs() < f64::EPSILON);

    let result = score_and_rank(&candidates, Weights::default());
    let scored_m1 = result
        .ranking
        .iter()
        .find(|entry| entry.candidate.id == "m1")
        .expect("m1 missing from ranking");
    assert!((scored_m1.score_cost - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_compromise_winner_narrative_names_criterion_winners() {
    let backends = [
        MockBackend::new("fast").with_latency_ms(1000).with_tokens(100_000, 0),
        MockBackend::new("balanced").with_latency_ms(2000).with_tokens(50_000, 0),
        MockBackend::new("smart").with_latency_ms(9000).with_tokens(400_000, 0),
        MockBackend::new("cheap").with_latency_ms(8000).with_tokens(10_000, 0),
    ];
    // Costs: fast 0.15, balanced 0.05, smart 0.40, cheap 0.01
    let prices = price_table(&[
        ("fast", 1.5, 0.0),
        ("balanced", 1.0, 0.0),
        ("smart", 1.0, 0.0),
        ("cheap", 1.0, 0.0),
    ]);
    let query = DocumentQuery::new("doc", "q");

    let replies = gather_replies(&backends, &query).await;
    let candidates = candidates_from_replies(
        &replies,
        &[
            ("fast", 1.0),
            ("balanced", 3.0),
            ("smart", 4.0),
            ("cheap", 1.5),
        ],
        &prices,
    );
    let result = score_and_rank(&candidates, Weights::new(0.4, 0.4, 0.2));

    assert_eq!(result.winner.as_deref(), Some("balanced"));
    assert!(result.is_compromise);
    assert_eq!(result.best_quality.as_deref(), Some("smart"));
    assert_eq!(result.best_speed.as_deref(), Some("fast"));
    assert_eq!(result.best_cost.as_deref(), Some("cheap"));
    for name in ["smart", "fast", "cheap"] {
        assert!(
            result.narrative.contains(name),
            "narrative should name {name}: {}",
            result.narrative
        );
    }
}

#[tokio::test]
async fn test_all_candidates_failing_yields_empty_result() {
    let backends = [
        MockBackend::new("m1").failing(),
        MockBackend::new("m2").failing(),
    ];
    let prices = PriceTable::new();
    let query = DocumentQuery::new("doc", "q");

    let replies = gather_replies(&backends, &query).await;
    assert!(replies.is_empty());

    let candidates = candidates_from_replies(&replies, &[("m1", 1.0), ("m2", 2.0)], &prices);
    let result = score_and_rank(&candidates, Weights::default());

    assert!(result.ranking.is_empty());
    assert!(result.winner.is_none());
    assert!(result.narrative.is_empty());
}

#[tokio::test]
async fn test_contributions_sum_to_composite_across_pipeline() {
    let backends = [
        MockBackend::new("m1").with_latency_ms(1200).with_tokens(2_000, 500),
        MockBackend::new("m2").with_latency_ms(3400).with_tokens(8_000, 900),
        MockBackend::new("m3").with_latency_ms(700).with_tokens(1_000, 200),
    ];
    let prices = price_table(&[("m1", 0.5, 1.5), ("m2", 2.0, 8.0), ("m3", 0.05, 0.4)]);
    let query = DocumentQuery::new("doc", "q");

    let replies = gather_replies(&backends, &query).await;
    let candidates =
        candidates_from_replies(&replies, &[("m1", 2.0), ("m2", 4.0), ("m3", 1.0)], &prices);
    let result = score_and_rank(&candidates, Weights::new(2.0, 1.0, 1.0));

    assert_eq!(result.ranking.len(), 3);
    for entry in &result.ranking {
        let sum = entry.contrib_quality + entry.contrib_speed + entry.contrib_cost;
        assert!((sum - entry.composite).abs() < 1e-9);
        assert!(entry.composite >= 0.0 && entry.composite <= 1.0 + 1e-9);
    }
}
