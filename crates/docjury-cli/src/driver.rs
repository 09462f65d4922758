//! Fan-out of one backend call per candidate and assembly of raw results.
//!
//! Calls run concurrently under a permit limit, each with its own timeout.
//! A failed or timed-out call drops only that candidate; siblings keep
//! running. Replies come back in the configured model order so the ranking
//! tie-break (first in input order wins) stays deterministic.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use docjury_core::{AppConfig, BackendReply, DocumentQuery, ModelBackend};
use docjury_ranking::{Candidate, PriceTable};

/// Invokes every backend once and collects the successful replies.
///
/// Replies are returned in the same order as `backends`, with failed
/// candidates removed.
pub(crate) async fn collect_replies(
    backends: &[Arc<dyn ModelBackend>],
    query: &Arc<DocumentQuery>,
    timeout: Duration,
    max_concurrent: usize,
) -> Vec<BackendReply> {
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut join_set = JoinSet::new();

    for (index, backend) in backends.iter().enumerate() {
        let backend = Arc::clone(backend);
        let query = Arc::clone(query);
        let semaphore = Arc::clone(&semaphore);

        join_set.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return (index, None);
            };

            match tokio::time::timeout(timeout, backend.answer(&query)).await {
                Ok(Ok(reply)) => (index, Some(reply)),
                Ok(Err(error)) => {
                    tracing::warn!(
                        "Backend {} failed: {error}; dropping candidate",
                        backend.model_id()
                    );
                    (index, None)
                }
                Err(_) => {
                    tracing::warn!(
                        "Backend {} timed out after {timeout:?}; dropping candidate",
                        backend.model_id()
                    );
                    (index, None)
                }
            }
        });
    }

    // Re-slot completion-ordered results back into submission order
    let mut slots: Vec<Option<BackendReply>> = vec![None; backends.len()];
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, reply)) => slots[index] = reply,
            Err(error) => tracing::warn!("Backend task panicked: {error}"),
        }
    }

    slots.into_iter().flatten().collect()
}

/// Turns raw replies into scoring-engine candidates.
///
/// Quality comes from the configured per-model rating; cost from the price
/// table and reported usage. A reply without a configured rating cannot be
/// scored and is dropped with a warning.
pub(crate) fn build_candidates(
    replies: &[BackendReply],
    config: &AppConfig,
    prices: &PriceTable,
) -> Vec<Candidate> {
    replies
        .iter()
        .filter_map(|reply| {
            let Some(entry) = config.model_entry(&reply.model_id) else {
                tracing::warn!(
                    "No configured rating for {}; dropping from comparison",
                    reply.model_id
                );
                return None;
            };

            let estimate = prices.estimate(&reply.model_id, reply.tokens);

            Some(Candidate {
                id: reply.model_id.clone(),
                quality: entry.quality,
                latency_seconds: reply.latency_seconds(),
                cost_usd: estimate.usd,
                cost_known: estimate.known,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docjury_core::{BackendKind, ModelEntry, TokenCounts};
    use docjury_providers::MockBackend;
    use docjury_ranking::ModelPricing;

    fn as_backend(mock: MockBackend) -> Arc<dyn ModelBackend> {
        Arc::new(mock)
    }

    fn query() -> Arc<DocumentQuery> {
        Arc::new(DocumentQuery::new("doc", "question"))
    }

    #[tokio::test]
    async fn test_replies_keep_submission_order() {
        // The slowest mock is listed first; order must not change
        let backends = vec![
            as_backend(MockBackend::new("slow").with_delay_ms(50)),
            as_backend(MockBackend::new("fast")),
        ];

        let replies = collect_replies(&backends, &query(), Duration::from_secs(5), 4).await;

        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].model_id, "slow");
        assert_eq!(replies[1].model_id, "fast");
    }

    #[tokio::test]
    async fn test_failed_backend_does_not_abort_siblings() {
        let backends = vec![
            as_backend(MockBackend::new("m1")),
            as_backend(MockBackend::new("broken").failing()),
            as_backend(MockBackend::new("m3")),
        ];

        let replies = collect_replies(&backends, &query(), Duration::from_secs(5), 4).await;

        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].model_id, "m1");
        assert_eq!(replies[1].model_id, "m3");
    }

    #[tokio::test]
    async fn test_timed_out_backend_is_dropped() {
        let backends = vec![
            as_backend(MockBackend::new("stuck").with_delay_ms(5000)),
            as_backend(MockBackend::new("quick")),
        ];

        let replies = collect_replies(&backends, &query(), Duration::from_millis(100), 4).await;

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].model_id, "quick");
    }

    #[tokio::test]
    async fn test_all_backends_failing_gives_empty_set() {
        let backends = vec![
            as_backend(MockBackend::new("m1").failing()),
            as_backend(MockBackend::new("m2").failing()),
        ];

        let replies = collect_replies(&backends, &query(), Duration::from_secs(5), 4).await;
        assert!(replies.is_empty());
    }

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.models = vec![ModelEntry {
            id: "m1".to_owned(),
            backend: BackendKind::OpenAi,
            quality: 3.0,
        }];
        config
    }

    fn reply(model_id: &str, tokens: TokenCounts) -> BackendReply {
        BackendReply {
            model_id: model_id.to_owned(),
            answer: "answer".to_owned(),
            latency_ms: 1500,
            tokens,
        }
    }

    #[test]
    fn test_build_candidates_uses_rating_and_pricing() {
        let config = test_config();
        let mut prices = PriceTable::new();
        prices.insert("m1", ModelPricing::new(1.0, 2.0));

        let replies = vec![reply("m1", TokenCounts::new(1_000_000, 1_000_000))];
        let candidates = build_candidates(&replies, &config, &prices);

        assert_eq!(candidates.len(), 1);
        assert!((candidates[0].quality - 3.0).abs() < f64::EPSILON);
        assert!((candidates[0].latency_seconds - 1.5).abs() < 1e-9);
        assert!((candidates[0].cost_usd - 3.0).abs() < 1e-9);
        assert!(candidates[0].cost_known);
    }

    #[test]
    fn test_build_candidates_flags_unknown_cost() {
        let config = test_config();
        let prices = PriceTable::new();

        let replies = vec![reply("m1", TokenCounts::default())];
        let candidates = build_candidates(&replies, &config, &prices);

        assert_eq!(candidates.len(), 1);
        assert!(!candidates[0].cost_known);
        assert!(candidates[0].cost_usd.abs() < f64::EPSILON);
    }

    #[test]
    fn test_build_candidates_drops_unrated_models() {
        let config = test_config();
        let prices = PriceTable::new();

        let replies = vec![reply("unrated", TokenCounts::default())];
        let candidates = build_candidates(&replies, &config, &prices);
        assert!(candidates.is_empty());
    }
}
