//! Weighted multi-criteria ranking engine for model comparison runs.
//!
//! Takes one raw result per candidate model (quality rating, latency, cost),
//! normalizes the metrics onto a common scale, blends them with user weights
//! into a composite score, and produces a ranked comparison with a
//! deterministic narrative explanation.
//!
//! The whole pipeline is synchronous, stateless, and pure: identical inputs
//! always produce identical output, and nothing here blocks or suspends.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        reason = "Allow for tests"
    )
)]

/// Narrative rule set for comparison results.
pub mod narrative;
/// Metric normalization onto the unit interval.
pub mod normalize;
/// Price table and monetary cost estimation.
pub mod pricing;
/// Ranking, per-criterion winners, and comparison assembly.
pub mod rank;
/// Composite scoring of candidates.
pub mod score;

pub use normalize::normalize;
pub use pricing::{CostEstimate, ModelPricing, PriceTable};
pub use rank::{ComparisonResult, Criterion, rank};
pub use score::{Candidate, QualityScale, ScoredCandidate, Weights, score_candidates};
