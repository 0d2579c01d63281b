//! Scoring engine
//!
//! Converts one prediction into points against a reported match result.
//! Exact score, correct result and correct goal count are mutually exclusive
//! tiers evaluated in that order; correct scorers always stack on top.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{Match, Prediction, ScoringConfig};

/// Points earned per criterion, already multiplied
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub exact_score: f64,
    pub correct_result: f64,
    pub correct_goals: f64,
    pub correct_scorers: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    ExactScore,
    CorrectResult,
    CorrectGoals,
    CorrectScorers,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub points: f64,
    pub breakdown: ScoreBreakdown,
    pub multiplier: f64,
    pub correct_scorer_count: u32,
    /// Criteria that awarded points, in evaluation order
    pub criteria: Vec<Criterion>,
}

impl ScoreResult {
    pub fn is_exact(&self) -> bool {
        self.criteria.contains(&Criterion::ExactScore)
    }
}

/// Score a prediction against a match.
///
/// Returns `None` when the match has no reported score yet. Callers only
/// score finished matches; see [`Match::is_scorable`].
pub fn score(prediction: &Prediction, game: &Match, config: &ScoringConfig) -> Option<ScoreResult> {
    let actual = game.final_score()?;
    let predicted = prediction.scoreline();
    let weights = &config.weights;
    let multiplier = config.resolve_multiplier(&game.competition_id, game.phase);

    let mut breakdown = ScoreBreakdown::default();
    let mut criteria = Vec::new();

    if predicted == actual {
        breakdown.exact_score = weights.exact_score * multiplier;
        criteria.push(Criterion::ExactScore);
    } else if predicted.outcome() == actual.outcome() {
        breakdown.correct_result = weights.correct_result * multiplier;
        criteria.push(Criterion::CorrectResult);
    } else {
        let matching_sides = [
            predicted.club == actual.club,
            predicted.opponent == actual.opponent,
        ]
        .iter()
        .filter(|hit| **hit)
        .count();

        if matching_sides > 0 {
            breakdown.correct_goals = matching_sides as f64 * weights.correct_goals * multiplier;
            criteria.push(Criterion::CorrectGoals);
        }
    }

    let correct_scorer_count = correct_scorers(&prediction.scorers, &game.scorers);
    if correct_scorer_count > 0 {
        breakdown.correct_scorers =
            correct_scorer_count as f64 * weights.correct_scorers * multiplier;
        criteria.push(Criterion::CorrectScorers);
    }

    let points = breakdown.exact_score
        + breakdown.correct_result
        + breakdown.correct_goals
        + breakdown.correct_scorers;

    Some(ScoreResult {
        points,
        breakdown,
        multiplier,
        correct_scorer_count,
        criteria,
    })
}

/// Distinct predicted scorer ids that appear among the actual scorers
fn correct_scorers(predicted: &[String], actual: &[String]) -> u32 {
    let actual: HashSet<&str> = actual.iter().map(String::as_str).collect();
    let predicted: HashSet<&str> = predicted.iter().map(String::as_str).collect();
    predicted.intersection(&actual).count() as u32
}
