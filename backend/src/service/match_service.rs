use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::api_error::ApiError;
use crate::models::{Competition, CreateMatchDTO, Match, MatchStatus, UpdateResultDTO};
use crate::service::prediction_service::validate_scorers;
use crate::service::user_service::require_admin;
use crate::store::BolaoStore;

/// Match Service - admin fixture management, result entry and status changes
#[derive(Clone)]
pub struct MatchService {
    store: Arc<dyn BolaoStore>,
}

impl MatchService {
    pub fn new(store: Arc<dyn BolaoStore>) -> Self {
        Self { store }
    }

    /// All matches, earliest kickoff first
    pub async fn list(&self) -> Result<Vec<Match>, ApiError> {
        let mut matches = self.store.list_matches().await?;
        matches.sort_by(|a, b| a.kickoff.cmp(&b.kickoff).then_with(|| a.id.cmp(&b.id)));
        Ok(matches)
    }

    /// Schedule a new match (admin only). It starts upcoming with no score.
    pub async fn create(&self, actor_id: &str, dto: CreateMatchDTO) -> Result<Match, ApiError> {
        require_admin(self.store.as_ref(), actor_id, "create matches").await?;
        dto.validate()?;

        let game = Match::from_dto(Uuid::new_v4().to_string(), dto);
        self.store.save_match(&game).await?;

        info!(
            match_id = %game.id,
            competition_id = %game.competition_id,
            phase = ?game.phase,
            kickoff = %game.kickoff,
            "Match created"
        );

        Ok(game)
    }

    /// Delete a match (admin only). Predictions already made for it stay in
    /// the store but no longer count.
    pub async fn remove(&self, actor_id: &str, match_id: &str) -> Result<(), ApiError> {
        require_admin(self.store.as_ref(), actor_id, "remove matches").await?;

        if !self.store.delete_match(match_id).await? {
            return Err(ApiError::not_found("Match not found"));
        }

        warn!(match_id = %match_id, user_id = %actor_id, "Match removed");
        Ok(())
    }

    /// Register or rename a competition (admin only)
    pub async fn save_competition(
        &self,
        actor_id: &str,
        competition: Competition,
    ) -> Result<Competition, ApiError> {
        require_admin(self.store.as_ref(), actor_id, "manage competitions").await?;

        let competition = Competition {
            id: competition.id.trim().to_string(),
            name: competition.name.trim().to_string(),
        };
        competition.validate()?;

        self.store.save_competition(&competition).await?;
        info!(competition_id = %competition.id, name = %competition.name, "Competition saved");

        Ok(competition)
    }

    /// Set a match's status, score and scorers (admin only).
    ///
    /// Rankings are recomputed from scratch on read, so correcting a finished
    /// result needs no follow-up here.
    pub async fn update_result(
        &self,
        actor_id: &str,
        match_id: &str,
        dto: UpdateResultDTO,
    ) -> Result<Match, ApiError> {
        require_admin(self.store.as_ref(), actor_id, "update match results").await?;

        let mut game = self
            .store
            .fetch_match(match_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Match not found"))?;

        dto.validate()?;
        Self::validate_result(&dto)?;

        let from = game.status;
        if from.can_transition_to(&dto.status) {
            info!(
                match_id = %match_id,
                from_status = %from,
                to_status = %dto.status,
                "Updating match"
            );
        } else {
            warn!(
                match_id = %match_id,
                from_status = %from,
                to_status = %dto.status,
                allowed = ?from.valid_next_states(),
                user_id = %actor_id,
                "Admin correction moves match status backwards"
            );
        }

        game.status = dto.status;
        game.club_score = dto.club_score;
        game.opponent_score = dto.opponent_score;
        game.scorers = dto.scorers;
        self.store.save_match(&game).await?;

        info!(
            match_id = %match_id,
            status = %game.status,
            club_score = ?game.club_score,
            opponent_score = ?game.opponent_score,
            counts_for_ranking = game.status.is_terminal(),
            "Match updated successfully"
        );

        Ok(game)
    }

    fn validate_result(dto: &UpdateResultDTO) -> Result<(), ApiError> {
        if dto.status == MatchStatus::Finished
            && (dto.club_score.is_none() || dto.opponent_score.is_none())
        {
            return Err(ApiError::validation(
                "A finished match requires both scores",
            ));
        }
        if dto.scorers.iter().any(|id| id.trim().is_empty()) {
            return Err(ApiError::validation("Scorer ids cannot be blank"));
        }
        validate_scorers(dto.club_score.unwrap_or(0), &dto.scorers)
    }
}
