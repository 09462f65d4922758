//! Composite scoring of candidates from normalized quality, speed, and cost.

use serde::{Deserialize, Serialize};

use docjury_core::{QualityScaleSettings, WeightSettings};

use crate::normalize::normalize;

/// Weights used if the caller supplies an all-zero (or degenerate) triple.
const FALLBACK_WEIGHTS: Weights = Weights {
    quality: 0.5,
    speed: 0.3,
    cost: 0.2,
};

/// Criterion weights for the composite score.
///
/// The triple the scoring engine actually uses always sums to 1: construct
/// with any non-negative values and call [`Weights::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    /// Weight of answer quality.
    pub quality: f64,
    /// Weight of response speed.
    pub speed: f64,
    /// Weight of monetary cost.
    pub cost: f64,
}

impl Weights {
    /// Creates a weight triple from raw non-negative values.
    #[must_use]
    pub fn new(quality: f64, speed: f64, cost: f64) -> Self {
        Self {
            quality,
            speed,
            cost,
        }
    }

    /// Rescales the triple to sum to exactly 1.
    ///
    /// A zero or non-finite sum cannot be rescaled; those inputs map to the
    /// fixed fallback (0.5, 0.3, 0.2) so a run always has usable weights.
    #[must_use]
    pub fn normalized(self) -> Self {
        let sum = self.quality + self.speed + self.cost;
        if sum <= 0.0 || !sum.is_finite() {
            return FALLBACK_WEIGHTS;
        }

        Self {
            quality: self.quality / sum,
            speed: self.speed / sum,
            cost: self.cost / sum,
        }
    }
}

impl Default for Weights {
    fn default() -> Self {
        FALLBACK_WEIGHTS
    }
}

impl From<WeightSettings> for Weights {
    fn from(settings: WeightSettings) -> Self {
        Self::new(settings.quality, settings.speed, settings.cost)
    }
}

/// Fixed bounds of the ordinal quality scale.
///
/// Quality is normalized against these absolute bounds, not against the
/// candidates observed in a run: the scale is curated externally and carries
/// meaning on its own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QualityScale {
    /// Lowest rating on the scale.
    pub min: f64,
    /// Highest rating on the scale.
    pub max: f64,
}

impl QualityScale {
    /// Creates a scale from its bounds.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Default for QualityScale {
    fn default() -> Self {
        Self::new(1.0, 4.0)
    }
}

impl From<QualityScaleSettings> for QualityScale {
    fn from(settings: QualityScaleSettings) -> Self {
        Self::new(settings.min, settings.max)
    }
}

/// One model's raw result set entering the scoring engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Model identifier, unique within the run.
    pub id: String,
    /// Externally injected quality rating on the configured ordinal scale.
    pub quality: f64,
    /// Observed call latency in seconds.
    pub latency_seconds: f64,
    /// Estimated monetary cost in USD (0.0 when unknown).
    pub cost_usd: f64,
    /// Whether the cost figure is backed by real usage and pricing data.
    pub cost_known: bool,
}

/// A candidate with its normalized scores, contributions, and composite.
///
/// Invariant: the three contributions sum to `composite` within floating
/// point tolerance, and each contribution equals score times weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// The raw candidate this scoring derives from.
    pub candidate: Candidate,
    /// Normalized quality score in `[0, 1]`.
    pub score_quality: f64,
    /// Normalized speed score in `[0, 1]` (higher is faster).
    pub score_speed: f64,
    /// Normalized cost score in `[0, 1]` (higher is cheaper).
    pub score_cost: f64,
    /// Quality's share of the composite.
    pub contrib_quality: f64,
    /// Speed's share of the composite.
    pub contrib_speed: f64,
    /// Cost's share of the composite.
    pub contrib_cost: f64,
    /// Weighted sum of the normalized scores.
    pub composite: f64,
}

/// Scores every candidate against the run's observed metric ranges.
///
/// Latency and cost are normalized relative to the candidates in this run
/// (inverted, since smaller is better); quality is normalized against the
/// fixed scale bounds. An empty input produces an empty output, never an
/// error. Raw values outside their declared domains are not validated: the
/// math stays well-defined, but scores may leave `[0, 1]`.
#[must_use]
pub fn score_candidates(
    candidates: &[Candidate],
    scale: QualityScale,
    weights: Weights,
) -> Vec<ScoredCandidate> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let weights = weights.normalized();

    let latency_min = fold_min(candidates.iter().map(|entry| entry.latency_seconds));
    let latency_max = fold_max(candidates.iter().map(|entry| entry.latency_seconds));
    let cost_min = fold_min(candidates.iter().map(|entry| entry.cost_usd));
    let cost_max = fold_max(candidates.iter().map(|entry| entry.cost_usd));

    candidates
        .iter()
        .map(|candidate| {
            let score_quality = normalize(candidate.quality, scale.min, scale.max, false);
            let score_speed = normalize(candidate.latency_seconds, latency_min, latency_max, true);
            let score_cost = normalize(candidate.cost_usd, cost_min, cost_max, true);

            let contrib_quality = score_quality * weights.quality;
            let contrib_speed = score_speed * weights.speed;
            let contrib_cost = score_cost * weights.cost;

            ScoredCandidate {
                candidate: candidate.clone(),
                score_quality,
                score_speed,
                score_cost,
                contrib_quality,
                contrib_speed,
                contrib_cost,
                composite: contrib_quality + contrib_speed + contrib_cost,
            }
        })
        .collect()
}

fn fold_min(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::INFINITY, f64::min)
}

fn fold_max(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, quality: f64, latency: f64, cost: f64) -> Candidate {
        Candidate {
            id: id.to_owned(),
            quality,
            latency_seconds: latency,
            cost_usd: cost,
            cost_known: true,
        }
    }

    #[test]
    fn test_weight_normalization_sums_to_one() {
        let cases = [
            Weights::new(0.5, 0.3, 0.2),
            Weights::new(1.0, 1.0, 1.0),
            Weights::new(5.0, 0.0, 3.0),
            Weights::new(0.01, 0.02, 0.97),
        ];
        for weights in cases {
            let normalized = weights.normalized();
            let sum = normalized.quality + normalized.speed + normalized.cost;
            assert!((sum - 1.0).abs() < 1e-12, "sum was {sum} for {weights:?}");
        }
    }

    #[test]
    fn test_zero_weights_fall_back_to_default() {
        let normalized = Weights::new(0.0, 0.0, 0.0).normalized();
        assert!((normalized.quality - 0.5).abs() < f64::EPSILON);
        assert!((normalized.speed - 0.3).abs() < f64::EPSILON);
        assert!((normalized.cost - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_candidate_list() {
        let scored = score_candidates(&[], QualityScale::default(), Weights::default());
        assert!(scored.is_empty());
    }

    #[test]
    fn test_contributions_sum_to_composite() {
        let candidates = vec![
            candidate("m1", 1.0, 2.0, 0.01),
            candidate("m2", 3.0, 5.0, 0.20),
            candidate("m3", 4.0, 3.5, 0.08),
        ];
        let scored = score_candidates(
            &candidates,
            QualityScale::default(),
            Weights::new(2.0, 1.0, 1.0),
        );

        for entry in &scored {
            let sum = entry.contrib_quality + entry.contrib_speed + entry.contrib_cost;
            assert!(
                (sum - entry.composite).abs() < 1e-9,
                "contributions {sum} != composite {} for {}",
                entry.composite,
                entry.candidate.id
            );
            assert!(entry.composite >= 0.0 && entry.composite <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn test_two_candidate_scenario() {
        // M1: worst quality, fastest, cheapest. M2: the mirror image.
        let candidates = vec![
            candidate("m1", 1.0, 2.0, 0.01),
            candidate("m2", 4.0, 5.0, 0.20),
        ];
        let scored = score_candidates(
            &candidates,
            QualityScale::new(1.0, 4.0),
            Weights::new(0.5, 0.3, 0.2),
        );

        assert!((scored[0].score_quality - 0.0).abs() < 1e-9);
        assert!((scored[0].score_speed - 1.0).abs() < 1e-9);
        assert!((scored[0].score_cost - 1.0).abs() < 1e-9);
        assert!((scored[0].composite - 0.5).abs() < 1e-9);

        assert!((scored[1].score_quality - 1.0).abs() < 1e-9);
        assert!((scored[1].score_speed - 0.0).abs() < 1e-9);
        assert!((scored[1].score_cost - 0.0).abs() < 1e-9);
        assert!((scored[1].composite - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_identical_latencies_all_score_full_speed() {
        let candidates = vec![
            candidate("m1", 1.0, 3.0, 0.01),
            candidate("m2", 2.0, 3.0, 0.05),
            candidate("m3", 3.0, 3.0, 0.10),
            candidate("m4", 4.0, 3.0, 0.20),
        ];
        let scored = score_candidates(&candidates, QualityScale::default(), Weights::default());

        for entry in &scored {
            assert!(
                (entry.score_speed - 1.0).abs() < 1e-9,
                "{} speed score {}",
                entry.candidate.id,
                entry.score_speed
            );
        }
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let candidates = vec![
            candidate("m1", 2.0, 1.5, 0.03),
            candidate("m2", 4.0, 4.0, 0.12),
        ];
        let first = score_candidates(&candidates, QualityScale::default(), Weights::default());
        let second = score_candidates(&candidates, QualityScale::default(), Weights::default());

        assert_eq!(first.len(), second.len());
        for (left, right) in first.iter().zip(&second) {
            assert!((left.composite - right.composite).abs() < f64::EPSILON);
            assert!((left.score_quality - right.score_quality).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_unknown_cost_scores_as_cheapest() {
        // A zero cost from missing usage data ranks favorably on the cost
        // criterion. This is the documented approximation, not a bug.
        let mut unknown = candidate("m1", 2.0, 1.0, 0.0);
        unknown.cost_known = false;
        let candidates = vec![unknown, candidate("m2", 4.0, 2.0, 0.30)];

        let scored = score_candidates(&candidates, QualityScale::default(), Weights::default());
        assert!((scored[0].score_cost - 1.0).abs() < 1e-9);
        assert!(!scored[0].candidate.cost_known);
    }
}
