use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::match_model::Scoreline;

/// A user's predicted score and scorers for one match ("bet")
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Prediction {
    /// Composite `{user_id}_{match_id}` key, one prediction per pair
    pub id: String,
    pub user_id: String,
    pub match_id: String,
    pub club_score: i32,
    pub opponent_score: i32,
    #[serde(default)]
    pub scorers: Vec<String>,
    pub submitted_at: DateTime<Utc>,
}

impl Prediction {
    /// Composite key for a (user, match) pair.
    ///
    /// Backslashes and underscores in the user id are escaped, so the first bare `_` always
    /// ends the user part and distinct pairs never share a key.
    pub fn key(user_id: &str, match_id: &str) -> String {
        let mut key = String::with_capacity(user_id.len() + match_id.len() + 1);
        for c in user_id.chars() {
            if c == '\\' || c == '_' {
                key.push('\\');
            }
            key.push(c);
        }
        key.push('_');
        key.push_str(match_id);
        key
    }

    pub fn new(
        user_id: &str,
        match_id: &str,
        scoreline: Scoreline,
        scorers: Vec<String>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Self::key(user_id, match_id),
            user_id: user_id.to_string(),
            match_id: match_id.to_string(),
            club_score: scoreline.club,
            opponent_score: scoreline.opponent,
            scorers,
            submitted_at,
        }
    }

    pub fn scoreline(&self) -> Scoreline {
        Scoreline::new(self.club_score, self.opponent_score)
    }
}

/// Prediction submission payload
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct SubmitPredictionDTO {
    #[validate(range(min = 0, message = "Scores cannot be negative"))]
    pub club_score: i32,
    #[validate(range(min = 0, message = "Scores cannot be negative"))]
    pub opponent_score: i32,
    #[serde(default)]
    pub scorers: Vec<String>,
}

impl SubmitPredictionDTO {
    /// Scorer ids with blank entries dropped
    pub fn selected_scorers(&self) -> Vec<String> {
        self.scorers
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}
