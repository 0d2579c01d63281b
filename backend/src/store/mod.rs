//! Persistence seam
//!
//! The scoring core never talks to storage directly; services read full
//! snapshots and write single records through [`BolaoStore`].

use async_trait::async_trait;

use crate::api_error::ApiError;
use crate::models::{Competition, Match, Prediction, RawConfig, ScoringConfig, User};

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::InMemoryStore;
pub use postgres::PgStore;
pub use seed::Seed;

#[async_trait]
pub trait BolaoStore: Send + Sync {
    async fn list_competitions(&self) -> Result<Vec<Competition>, ApiError>;

    async fn list_users(&self) -> Result<Vec<User>, ApiError>;

    async fn list_matches(&self) -> Result<Vec<Match>, ApiError>;

    async fn list_predictions(&self) -> Result<Vec<Prediction>, ApiError>;

    /// Authoritative read of a single match, bypassing any cached view
    async fn fetch_match(&self, match_id: &str) -> Result<Option<Match>, ApiError>;

    async fn fetch_user(&self, user_id: &str) -> Result<Option<User>, ApiError>;

    /// Insert or replace by composite key (last writer wins)
    async fn upsert_prediction(&self, prediction: &Prediction) -> Result<(), ApiError>;

    async fn save_match(&self, game: &Match) -> Result<(), ApiError>;

    /// Remove a match, `false` when it did not exist. Its predictions are
    /// left behind and skipped by the ranking.
    async fn delete_match(&self, match_id: &str) -> Result<bool, ApiError>;

    async fn save_user(&self, user: &User) -> Result<(), ApiError>;

    async fn save_competition(&self, competition: &Competition) -> Result<(), ApiError>;

    /// Stored configuration document, `None` when never saved
    async fn load_raw_config(&self) -> Result<Option<RawConfig>, ApiError>;

    async fn save_config(&self, config: &ScoringConfig) -> Result<(), ApiError>;

    async fn health_check(&self) -> Result<(), ApiError>;
}
