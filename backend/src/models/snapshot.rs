use serde::{Deserialize, Serialize};

use super::competition::Competition;
use super::match_model::Match;
use super::prediction::Prediction;
use super::scoring_config::ScoringConfig;
use super::user::User;

/// Full application context for one recomputation.
///
/// Scores and rankings are always derived from a complete snapshot, never
/// patched incrementally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub competitions: Vec<Competition>,
    pub users: Vec<User>,
    pub matches: Vec<Match>,
    pub predictions: Vec<Prediction>,
    pub config: ScoringConfig,
}

impl Snapshot {
    pub fn find_user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Finished matches with a complete score, oldest first (ties by id)
    pub fn scorable_matches(&self) -> Vec<&Match> {
        let mut matches: Vec<&Match> = self.matches.iter().filter(|m| m.is_scorable()).collect();
        matches.sort_by(|a, b| a.kickoff.cmp(&b.kickoff).then_with(|| a.id.cmp(&b.id)));
        matches
    }
}
