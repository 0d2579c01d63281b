//! Scoring configuration: base point values and the competition x phase
//! multiplier table, plus the one-shot migration from the legacy two-weight
//! model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::match_model::Phase;

pub const DEFAULT_MAX_GOALS: i32 = 20;

/// Regular-phase weight of each competition in a fresh configuration
const DEFAULT_COMPETITION_WEIGHTS: [(&str, f64); 4] = [
    ("brasileirao", 1.0),
    ("carioca", 0.5),
    ("recopa", 1.5),
    ("supercopa", 1.5),
];

/// Base point values, multiplied by the resolved competition/phase weight
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoringWeights {
    pub exact_score: f64,
    pub correct_result: f64,
    pub correct_goals: f64,
    /// Per correctly predicted scorer
    pub correct_scorers: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            exact_score: 10.0,
            correct_result: 3.0,
            correct_goals: 2.0,
            correct_scorers: 5.0,
        }
    }
}

/// Multipliers for each phase of one competition
pub type PhaseWeights = BTreeMap<Phase, f64>;

/// The default phase row for a competition whose regular weight is `base`
pub fn standard_phase_weights(base: f64) -> PhaseWeights {
    legacy_phase_row(base, &BTreeMap::new())
}

/// Knockout multiplier applied to a competition's regular weight
fn standard_phase_factor(phase: Phase) -> f64 {
    match phase {
        Phase::Regular => 1.0,
        Phase::RoundOf16 => 1.5,
        Phase::Quarterfinal => 1.75,
        Phase::Semifinal => 2.0,
        Phase::Final => 3.0,
    }
}

fn legacy_phase_row(base: f64, legacy_phases: &BTreeMap<Phase, f64>) -> PhaseWeights {
    Phase::ALL
        .into_iter()
        .map(|phase| {
            // Regular is the competition weight itself, never scaled by a
            // legacy regular-phase multiplier.
            let factor = match phase {
                Phase::Regular => 1.0,
                _ => legacy_phases
                    .get(&phase)
                    .copied()
                    .unwrap_or_else(|| standard_phase_factor(phase)),
            };
            (phase, base * factor)
        })
        .collect()
}

/// Multiplier table shipped with a fresh configuration
pub fn default_championship_phase_weights() -> BTreeMap<String, PhaseWeights> {
    DEFAULT_COMPETITION_WEIGHTS
        .iter()
        .map(|(competition, base)| (competition.to_string(), standard_phase_weights(*base)))
        .collect()
}

/// Current scoring configuration (singleton, admin-mutable)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    pub max_goals: i32,
    pub weights: ScoringWeights,
    #[serde(default = "default_championship_phase_weights")]
    pub championship_phase_weights: BTreeMap<String, PhaseWeights>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_goals: DEFAULT_MAX_GOALS,
            weights: ScoringWeights::default(),
            championship_phase_weights: default_championship_phase_weights(),
        }
    }
}

impl ScoringConfig {
    /// Multiplier for a (competition, phase) pair.
    ///
    /// Falls back to the competition's regular entry, then to 1.0. Entries
    /// that are not finite numbers count as missing. Never fails.
    pub fn resolve_multiplier(&self, competition_id: &str, phase: Phase) -> f64 {
        let Some(phases) = self.championship_phase_weights.get(competition_id) else {
            return 1.0;
        };
        let entry = |phase: Phase| phases.get(&phase).copied().filter(|m| m.is_finite());

        entry(phase).or_else(|| entry(Phase::Regular)).unwrap_or(1.0)
    }

    /// Problems that make the configuration unusable, if any
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_goals < 1 {
            errors.push("maxGoals must be at least 1".to_string());
        }

        let weights = [
            ("exactScore", self.weights.exact_score),
            ("correctResult", self.weights.correct_result),
            ("correctGoals", self.weights.correct_goals),
            ("correctScorers", self.weights.correct_scorers),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("weight {} must be a non-negative number", name));
            }
        }

        for (competition, phases) in &self.championship_phase_weights {
            for (phase, value) in phases {
                if !value.is_finite() || *value < 0.0 {
                    errors.push(format!(
                        "multiplier {}/{} must be a non-negative number",
                        competition, phase
                    ));
                }
            }
        }

        errors
    }
}

/// Configuration document as stored, possibly still in the legacy shape
/// (a flat per-competition weight plus a flat per-phase multiplier).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_goals: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<ScoringWeights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub championship_phase_weights: Option<BTreeMap<String, PhaseWeights>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub championship_weights: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase_weights: Option<BTreeMap<Phase, f64>>,
}

impl From<&ScoringConfig> for RawConfig {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            max_goals: Some(config.max_goals),
            weights: Some(config.weights),
            championship_phase_weights: Some(config.championship_phase_weights.clone()),
            championship_weights: None,
            phase_weights: None,
        }
    }
}

/// Outcome of [`migrate_config`]
#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    pub config: ScoringConfig,
    /// Competitions whose two-axis row was synthesized from legacy weights
    pub migrated: Vec<String>,
}

impl Migration {
    pub fn needs_persist(&self) -> bool {
        !self.migrated.is_empty()
    }
}

/// Normalize a stored configuration document.
///
/// Stored fields replace the defaults one by one. A stored two-axis table is
/// authoritative as a whole: the legacy weights are only converted when the
/// document has no table yet, so running this on its own output changes
/// nothing and a row removed by an admin stays removed.
pub fn migrate_config(raw: &RawConfig) -> Migration {
    let defaults = ScoringConfig::default();
    let mut migrated = Vec::new();

    let table = match (&raw.championship_phase_weights, &raw.championship_weights) {
        (Some(table), _) => table.clone(),
        (None, Some(legacy)) => {
            let legacy_phases = raw.phase_weights.clone().unwrap_or_default();
            migrated.extend(legacy.keys().cloned());
            legacy
                .iter()
                .map(|(competition, base)| {
                    (competition.clone(), legacy_phase_row(*base, &legacy_phases))
                })
                .collect()
        }
        (None, None) => defaults.championship_phase_weights.clone(),
    };

    Migration {
        config: ScoringConfig {
            max_goals: raw.max_goals.unwrap_or(defaults.max_goals),
            weights: raw.weights.unwrap_or(defaults.weights),
            championship_phase_weights: table,
        },
        migrated,
    }
}
