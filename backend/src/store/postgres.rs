use async_trait::async_trait;
use sqlx::types::Json;
use tracing::debug;

use super::BolaoStore;
use crate::api_error::ApiError;
use crate::db::DbPool;
use crate::models::{Competition, Match, Prediction, RawConfig, ScoringConfig, User};

const CONFIG_DOCUMENT_ID: &str = "main";

const MATCH_COLUMNS: &str = r#"
    id, competition_id, opponent, kickoff, status, phase, venue,
    location, club_score, opponent_score, scorers
"#;

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    db_pool: DbPool,
}

impl PgStore {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }

    /// Apply the bundled schema migrations
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.db_pool).await
    }
}

#[async_trait]
impl BolaoStore for PgStore {
    async fn list_competitions(&self) -> Result<Vec<Competition>, ApiError> {
        sqlx::query_as::<_, Competition>("SELECT id, name FROM competitions ORDER BY name ASC")
            .fetch_all(&self.db_pool)
            .await
            .map_err(ApiError::database_error)
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        sqlx::query_as::<_, User>("SELECT id, name, email, role FROM users ORDER BY id ASC")
            .fetch_all(&self.db_pool)
            .await
            .map_err(ApiError::database_error)
    }

    async fn list_matches(&self) -> Result<Vec<Match>, ApiError> {
        let query = format!("SELECT {} FROM matches ORDER BY kickoff ASC, id ASC", MATCH_COLUMNS);
        sqlx::query_as::<_, Match>(&query)
            .fetch_all(&self.db_pool)
            .await
            .map_err(ApiError::database_error)
    }

    async fn list_predictions(&self) -> Result<Vec<Prediction>, ApiError> {
        sqlx::query_as::<_, Prediction>(
            r#"
            SELECT id, user_id, match_id, club_score, opponent_score, scorers, submitted_at
            FROM predictions
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .map_err(ApiError::database_error)
    }

    async fn fetch_match(&self, match_id: &str) -> Result<Option<Match>, ApiError> {
        let query = format!("SELECT {} FROM matches WHERE id = $1", MATCH_COLUMNS);
        sqlx::query_as::<_, Match>(&query)
            .bind(match_id)
            .fetch_optional(&self.db_pool)
            .await
            .map_err(ApiError::database_error)
    }

    async fn fetch_user(&self, user_id: &str) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>("SELECT id, name, email, role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await
            .map_err(ApiError::database_error)
    }

    async fn upsert_prediction(&self, prediction: &Prediction) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            INSERT INTO predictions (
                id, user_id, match_id, club_score, opponent_score, scorers, submitted_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7
            )
            ON CONFLICT (user_id, match_id) DO UPDATE SET
                id = EXCLUDED.id,
                club_score = EXCLUDED.club_score,
                opponent_score = EXCLUDED.opponent_score,
                scorers = EXCLUDED.scorers,
                submitted_at = EXCLUDED.submitted_at
            "#,
        )
        .bind(&prediction.id)
        .bind(&prediction.user_id)
        .bind(&prediction.match_id)
        .bind(prediction.club_score)
        .bind(prediction.opponent_score)
        .bind(&prediction.scorers)
        .bind(prediction.submitted_at)
        .execute(&self.db_pool)
        .await
        .map_err(ApiError::database_error)?;

        debug!(prediction_id = %prediction.id, "Prediction upserted");
        Ok(())
    }

    async fn save_match(&self, game: &Match) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            INSERT INTO matches (
                id, competition_id, opponent, kickoff, status, phase, venue,
                location, club_score, opponent_score, scorers
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11
            )
            ON CONFLICT (id) DO UPDATE SET
                competition_id = EXCLUDED.competition_id,
                opponent = EXCLUDED.opponent,
                kickoff = EXCLUDED.kickoff,
                status = EXCLUDED.status,
                phase = EXCLUDED.phase,
                venue = EXCLUDED.venue,
                location = EXCLUDED.location,
                club_score = EXCLUDED.club_score,
                opponent_score = EXCLUDED.opponent_score,
                scorers = EXCLUDED.scorers
            "#,
        )
        .bind(&game.id)
        .bind(&game.competition_id)
        .bind(&game.opponent)
        .bind(game.kickoff)
        .bind(game.status)
        .bind(game.phase)
        .bind(game.venue)
        .bind(&game.location)
        .bind(game.club_score)
        .bind(game.opponent_score)
        .bind(&game.scorers)
        .execute(&self.db_pool)
        .await
        .map_err(ApiError::database_error)?;

        debug!(match_id = %game.id, status = %game.status, "Match saved");
        Ok(())
    }

    async fn delete_match(&self, match_id: &str) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(match_id)
            .execute(&self.db_pool)
            .await
            .map_err(ApiError::database_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn save_user(&self, user: &User) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                role = EXCLUDED.role
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role)
        .execute(&self.db_pool)
        .await
        .map_err(ApiError::database_error)?;

        Ok(())
    }

    async fn save_competition(&self, competition: &Competition) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            INSERT INTO competitions (id, name)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name
            "#,
        )
        .bind(&competition.id)
        .bind(&competition.name)
        .execute(&self.db_pool)
        .await
        .map_err(ApiError::database_error)?;

        Ok(())
    }

    async fn load_raw_config(&self) -> Result<Option<RawConfig>, ApiError> {
        let document = sqlx::query_scalar::<_, Json<RawConfig>>(
            "SELECT document FROM scoring_config WHERE id = $1",
        )
        .bind(CONFIG_DOCUMENT_ID)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(ApiError::database_error)?;

        Ok(document.map(|Json(raw)| raw))
    }

    async fn save_config(&self, config: &ScoringConfig) -> Result<(), ApiError> {
        // jsonb `||` merges top-level keys, so legacy fields survive
        sqlx::query(
            r#"
            INSERT INTO scoring_config (id, document)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET
                document = scoring_config.document || EXCLUDED.document
            "#,
        )
        .bind(CONFIG_DOCUMENT_ID)
        .bind(Json(RawConfig::from(config)))
        .execute(&self.db_pool)
        .await
        .map_err(ApiError::database_error)?;

        Ok(())
    }

    async fn health_check(&self) -> Result<(), ApiError> {
        crate::db::health_check(&self.db_pool).await
    }
}
