//! Shared fixtures for docjury integration tests.
//!
//! These helpers run the comparison pipeline the way the CLI does, but
//! entirely over mock backends, so tests cover the real seams between
//! extraction, providers, cost estimation, scoring, and ranking.

use docjury_core::{BackendReply, DocumentQuery, ModelBackend as _};
use docjury_providers::MockBackend;
use docjury_ranking::{
    Candidate, ComparisonResult, PriceTable, QualityScale, Weights, rank, score_candidates,
};

/// Collects replies from mock backends, skipping failed candidates the way
/// the orchestration layer does.
pub async fn gather_replies(backends: &[MockBackend], query: &DocumentQuery) -> Vec<BackendReply> {
    let mut replies = Vec::new();
    for backend in backends {
        if let Ok(reply) = backend.answer(query).await {
            replies.push(reply);
        }
    }
    replies
}

/// Builds scoring candidates from replies using a quality-rating lookup and
/// a price table.
pub fn candidates_from_replies(
    replies: &[BackendReply],
    ratings: &[(&str, f64)],
    prices: &PriceTable,
) -> Vec<Candidate> {
    replies
        .iter()
        .filter_map(|reply| {
            let quality = ratings
                .iter()
                .find(|(id, _)| *id == reply.model_id)
                .map(|(_, rating)| *rating)?;
            let estimate = prices.estimate(&reply.model_id, reply.tokens);
            Some(Candidate {
                id: reply.model_id.clone(),
                quality,
                latency_seconds: reply.latency_seconds(),
                cost_usd: estimate.usd,
                cost_known: estimate.known,
            })
        })
        .collect()
}

/// Scores and ranks candidates on the default 1-4 quality scale.
pub fn score_and_rank(candidates: &[Candidate], weights: Weights) -> ComparisonResult {
    let scored = score_candidates(candidates, QualityScale::new(1.0, 4.0), weights);
    rank(scored, weights)
}
