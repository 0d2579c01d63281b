use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::api_error::ApiError;
use crate::models::{Match, MatchStatus, Prediction, Scoreline, ScoringConfig, SubmitPredictionDTO};
use crate::service::config_service::ConfigService;
use crate::service::scoring_service::{score, ScoreResult};
use crate::store::BolaoStore;

/// A prediction together with its points, once the match is finished
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredPrediction {
    #[serde(flatten)]
    pub prediction: Prediction,
    pub result: Option<ScoreResult>,
}

impl ScoredPrediction {
    fn new(prediction: Prediction, game: Option<&Match>, config: &ScoringConfig) -> Self {
        let result = game
            .filter(|game| game.is_scorable())
            .and_then(|game| score(&prediction, game, config));
        Self { prediction, result }
    }
}

/// Participants' predictions for one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPredictions {
    #[serde(rename = "match")]
    pub game: Match,
    pub predictions: Vec<ScoredPrediction>,
}

/// Prediction Service - submission and listing of predictions
#[derive(Clone)]
pub struct PredictionService {
    store: Arc<dyn BolaoStore>,
    config_service: ConfigService,
}

impl PredictionService {
    pub fn new(store: Arc<dyn BolaoStore>, config_service: ConfigService) -> Self {
        Self {
            store,
            config_service,
        }
    }

    /// Create or replace the user's prediction for a match.
    ///
    /// The match is re-read from the store first: a match that left
    /// `upcoming` after the user loaded it is rejected with
    /// [`ApiError::MatchUnavailable`], not a validation error.
    pub async fn submit(
        &self,
        user_id: &str,
        match_id: &str,
        dto: SubmitPredictionDTO,
    ) -> Result<Prediction, ApiError> {
        self.store
            .fetch_user(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        let game = self
            .store
            .fetch_match(match_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Match not found"))?;

        if !game.status.accepts_predictions() {
            warn!(
                user_id = %user_id,
                match_id = %match_id,
                status = %game.status,
                "Prediction rejected: match no longer open"
            );
            return Err(ApiError::MatchUnavailable {
                match_id: match_id.to_string(),
                status: game.status.to_string(),
            });
        }

        dto.validate()?;
        let config = self.config_service.load().await?;
        let scorers = dto.selected_scorers();
        validate_prediction(&dto, &scorers, &config)?;

        let prediction = Prediction::new(
            user_id,
            match_id,
            Scoreline::new(dto.club_score, dto.opponent_score),
            scorers,
            Utc::now(),
        );
        self.store.upsert_prediction(&prediction).await?;

        info!(
            user_id = %user_id,
            match_id = %match_id,
            club_score = prediction.club_score,
            opponent_score = prediction.opponent_score,
            scorers = prediction.scorers.len(),
            "Prediction saved"
        );

        Ok(prediction)
    }

    /// A user's predictions, most recent match first
    pub async fn for_user(&self, user_id: &str) -> Result<Vec<ScoredPrediction>, ApiError> {
        self.store
            .fetch_user(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        let config = self.config_service.load().await?;
        let matches = self.store.list_matches().await?;
        let by_id: HashMap<&str, &Match> = matches.iter().map(|m| (m.id.as_str(), m)).collect();

        let mut predictions: Vec<Prediction> = self
            .store
            .list_predictions()
            .await?
            .into_iter()
            .filter(|p| p.user_id == user_id)
            .collect();

        // Predictions for deleted matches sort last
        predictions.sort_by(|a, b| {
            let kickoff = |p: &Prediction| by_id.get(p.match_id.as_str()).map(|m| m.kickoff);
            kickoff(b).cmp(&kickoff(a)).then_with(|| a.match_id.cmp(&b.match_id))
        });

        debug!(user_id = %user_id, count = predictions.len(), "Listing user predictions");

        Ok(predictions
            .into_iter()
            .map(|p| {
                let game = by_id.get(p.match_id.as_str()).copied();
                ScoredPrediction::new(p, game, &config)
            })
            .collect())
    }

    /// Everyone's predictions for a match, revealed once it kicks off
    pub async fn for_match(&self, match_id: &str) -> Result<MatchPredictions, ApiError> {
        let game = self
            .store
            .fetch_match(match_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Match not found"))?;

        if game.status == MatchStatus::Upcoming {
            return Err(ApiError::forbidden(
                "Predictions are revealed once the match starts",
            ));
        }

        let config = self.config_service.load().await?;
        let mut predictions: Vec<ScoredPrediction> = self
            .store
            .list_predictions()
            .await?
            .into_iter()
            .filter(|p| p.match_id == match_id)
            .map(|p| ScoredPrediction::new(p, Some(&game), &config))
            .collect();
        predictions.sort_by(|a, b| a.prediction.user_id.cmp(&b.prediction.user_id));

        Ok(MatchPredictions { game, predictions })
    }
}

/// Input rules beyond the derived range checks
fn validate_prediction(
    dto: &SubmitPredictionDTO,
    scorers: &[String],
    config: &ScoringConfig,
) -> Result<(), ApiError> {
    if dto.club_score > config.max_goals || dto.opponent_score > config.max_goals {
        return Err(ApiError::validation(format!(
            "Scores cannot exceed {} goals",
            config.max_goals
        )));
    }
    validate_scorers(dto.club_score, scorers)
}

/// Scorers only make sense for goals the club actually scores
pub(crate) fn validate_scorers(club_score: i32, scorers: &[String]) -> Result<(), ApiError> {
    if club_score == 0 && !scorers.is_empty() {
        return Err(ApiError::validation(
            "Scorers cannot be selected when the club scores no goals",
        ));
    }
    if scorers.len() > usize::try_from(club_score).unwrap_or(0) {
        return Err(ApiError::validation(format!(
            "Selected {} scorers for {} goals",
            scorers.len(),
            club_score
        )));
    }
    Ok(())
}
