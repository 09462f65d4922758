//! Ordering of scored candidates and assembly of the comparison result.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::narrative::{self, NarrativeContext};
use crate::score::{ScoredCandidate, Weights};

/// The three criteria blended into the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Criterion {
    /// Answer quality.
    Quality,
    /// Response speed.
    Speed,
    /// Monetary cost.
    Cost,
}

impl Criterion {
    /// Tie-break priority order for the main-driver determination.
    pub const PRIORITY_ORDER: [Self; 3] = [Self::Quality, Self::Speed, Self::Cost];

    /// This criterion's normalized score for a scored candidate.
    #[must_use]
    pub fn score_of(self, entry: &ScoredCandidate) -> f64 {
        match self {
            Self::Quality => entry.score_quality,
            Self::Speed => entry.score_speed,
            Self::Cost => entry.score_cost,
        }
    }

    /// This criterion's contribution to a candidate's composite.
    #[must_use]
    pub fn contribution_of(self, entry: &ScoredCandidate) -> f64 {
        match self {
            Self::Quality => entry.contrib_quality,
            Self::Speed => entry.contrib_speed,
            Self::Cost => entry.contrib_cost,
        }
    }
}

impl Display for Criterion {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Quality => write!(formatter, "quality"),
            Self::Speed => write!(formatter, "speed"),
            Self::Cost => write!(formatter, "cost"),
        }
    }
}

/// Outcome of one comparison run.
///
/// An empty candidate set produces an empty result (no winner, empty
/// narrative); the presentation layer decides how to message that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Candidates ordered by composite score, descending. Ties keep the
    /// input order.
    pub ranking: Vec<ScoredCandidate>,
    /// Identifier of the top-ranked candidate.
    pub winner: Option<String>,
    /// Candidate with the best quality score on its own.
    pub best_quality: Option<String>,
    /// Candidate with the best speed score on its own.
    pub best_speed: Option<String>,
    /// Candidate with the best cost score on its own.
    pub best_cost: Option<String>,
    /// True when the winner tops none of the three criteria individually.
    pub is_compromise: bool,
    /// Criterion contributing most to the winner's composite.
    pub main_driver: Option<Criterion>,
    /// Composite-score lead of the winner over the runner-up.
    pub runner_up_gap: Option<f64>,
    /// Deterministic template-based explanation of the outcome.
    pub narrative: String,
}

impl ComparisonResult {
    fn empty() -> Self {
        Self {
            ranking: Vec::new(),
            winner: None,
            best_quality: None,
            best_speed: None,
            best_cost: None,
            is_compromise: false,
            main_driver: None,
            runner_up_gap: None,
            narrative: String::new(),
        }
    }
}

/// Orders scored candidates and derives the comparison outcome.
///
/// The sort is stable and descending by composite, so equal composites rank
/// in input order; that is the tie-break rule. Per-criterion winners are
/// likewise first-wins on ties, evaluated in input order.
#[must_use]
pub fn rank(scored: Vec<ScoredCandidate>, weights: Weights) -> ComparisonResult {
    if scored.is_empty() {
        return ComparisonResult::empty();
    }

    let weights = weights.normalized();

    // Per-criterion winners are determined over the input ordering, before
    // the composite sort rearranges anything.
    let best_quality = criterion_winner(&scored, Criterion::Quality);
    let best_speed = criterion_winner(&scored, Criterion::Speed);
    let best_cost = criterion_winner(&scored, Criterion::Cost);

    let mut ranking = scored;
    ranking.sort_by(|left, right| right.composite.total_cmp(&left.composite));

    let winner = &ranking[0];
    let winner_id = winner.candidate.id.clone();

    let is_compromise =
        winner_id != best_quality && winner_id != best_speed && winner_id != best_cost;

    let main_driver = main_driver(winner);

    let runner_up = ranking.get(1);
    let runner_up_gap = runner_up.map(|entry| winner.composite - entry.composite);

    let narrative = narrative::compose(&NarrativeContext {
        weights,
        ranking: &ranking,
        winner,
        runner_up,
        best_quality: &best_quality,
        best_speed: &best_speed,
        best_cost: &best_cost,
        is_compromise,
        main_driver,
    });

    ComparisonResult {
        winner: Some(winner_id),
        best_quality: Some(best_quality),
        best_speed: Some(best_speed),
        best_cost: Some(best_cost),
        is_compromise,
        main_driver: Some(main_driver),
        runner_up_gap,
        narrative,
        ranking,
    }
}

/// Identifier of the candidate with the highest score on one criterion.
///
/// Strict comparison keeps the first occurrence on ties.
fn criterion_winner(scored: &[ScoredCandidate], criterion: Criterion) -> String {
    let mut best = &scored[0];
    for entry in &scored[1..] {
        if criterion.score_of(entry) > criterion.score_of(best) {
            best = entry;
        }
    }
    best.candidate.id.clone()
}

/// The criterion with the largest contribution to the winner's composite.
///
/// Ties resolve by the fixed priority order quality > speed > cost.
fn main_driver(winner: &ScoredCandidate) -> Criterion {
    let mut driver = Criterion::Quality;
    for criterion in Criterion::PRIORITY_ORDER {
        if criterion.contribution_of(winner) > driver.contribution_of(winner) {
            driver = criterion;
        }
    }
    driver
}
