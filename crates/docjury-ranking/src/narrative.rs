//! Deterministic narrative generation for comparison results.
//!
//! The narrative is assembled from an ordered list of independent rules.
//! Each rule is a pure function from the comparison context to an optional
//! sentence; rules that do not apply simply yield nothing. No model is
//! involved in producing this text.

use crate::rank::Criterion;
use crate::score::{ScoredCandidate, Weights};

/// Normalized score above which a candidate counts as notably fast or cheap.
const EFFICIENCY_THRESHOLD: f64 = 0.8;

/// Normalized quality below which a candidate counts as lower quality.
const LOWER_QUALITY_THRESHOLD: f64 = 0.5;

/// Composite gaps smaller than this read as a dead heat.
const TIE_TOLERANCE: f64 = 1e-9;

/// Everything the narrative rules may look at for one comparison run.
pub struct NarrativeContext<'run> {
    /// Active (normalized) weights.
    pub weights: Weights,
    /// Full ranking, descending by composite.
    pub ranking: &'run [ScoredCandidate],
    /// The top-ranked candidate.
    pub winner: &'run ScoredCandidate,
    /// The second-ranked candidate, when more than one ran.
    pub runner_up: Option<&'run ScoredCandidate>,
    /// Identifier of the best-quality candidate.
    pub best_quality: &'run str,
    /// Identifier of the fastest candidate.
    pub best_speed: &'run str,
    /// Identifier of the cheapest candidate.
    pub best_cost: &'run str,
    /// Whether the winner tops none of the criteria individually.
    pub is_compromise: bool,
    /// Criterion contributing most to the winner's composite.
    pub main_driver: Criterion,
}

/// A single narrative rule: context in, optional sentence out.
pub type Rule = fn(&NarrativeContext<'_>) -> Option<String>;

/// The rule set, in the order sentences appear in the narrative.
pub const RULES: &[Rule] = &[
    winner_sentence,
    driver_sentence,
    compromise_sentence,
    gap_sentence,
    efficiency_sentence,
];

/// Runs every rule in order and joins the sentences that applied.
#[must_use]
pub fn compose(context: &NarrativeContext<'_>) -> String {
    RULES
        .iter()
        .filter_map(|rule| rule(context))
        .collect::<Vec<_>>()
        .join(" ")
}

/// States the winner and its composite under the active weights.
fn winner_sentence(context: &NarrativeContext<'_>) -> Option<String> {
    Some(format!(
        "{} ranks first with a composite score of {:.3} under weights \
         quality {:.2}, speed {:.2}, cost {:.2}.",
        context.winner.candidate.id,
        context.winner.composite,
        context.weights.quality,
        context.weights.speed,
        context.weights.cost,
    ))
}

/// States which criterion carried the winner.
fn driver_sentence(context: &NarrativeContext<'_>) -> Option<String> {
    Some(format!(
        "Its ranking is driven mainly by {} (contribution {:.3}).",
        context.main_driver,
        context.main_driver.contribution_of(context.winner),
    ))
}

/// Frames a compromise winner against the per-criterion winners.
fn compromise_sentence(context: &NarrativeContext<'_>) -> Option<String> {
    if !context.is_compromise {
        return None;
    }

    Some(format!(
        "{} tops no single criterion: {} has the best quality, {} is the \
         fastest, and {} is the cheapest. It wins as the balanced pick.",
        context.winner.candidate.id,
        context.best_quality,
        context.best_speed,
        context.best_cost,
    ))
}

/// States the composite lead over the runner-up, or the tie-break.
fn gap_sentence(context: &NarrativeContext<'_>) -> Option<String> {
    let runner_up = context.runner_up?;
    let gap = context.winner.composite - runner_up.composite;

    if gap.abs() < TIE_TOLERANCE {
        Some(format!(
            "It ties with {} on composite score and ranks first by submission order.",
            runner_up.candidate.id,
        ))
    } else {
        Some(format!(
            "It leads {} by {gap:.3} composite points.",
            runner_up.candidate.id,
        ))
    }
}

/// Flags candidates that are notably fast or cheap but lower quality.
///
/// Applies to any candidate over the efficiency threshold, winner included.
fn efficiency_sentence(context: &NarrativeContext<'_>) -> Option<String> {
    let notes: Vec<String> = context
        .ranking
        .iter()
        .filter(|entry| {
            (entry.score_speed > EFFICIENCY_THRESHOLD || entry.score_cost > EFFICIENCY_THRESHOLD)
                && entry.score_quality < LOWER_QUALITY_THRESHOLD
        })
        .map(|entry| {
            format!(
                "{} is efficient but lower quality (speed {:.2}, cost {:.2}, quality {:.2}).",
                entry.candidate.id,
                entry.score_speed,
                entry.score_cost,
                entry.score_quality,
            )
        })
        .collect();

    if notes.is_empty() {
        return None;
    }
    Some(notes.join(" "))
}
