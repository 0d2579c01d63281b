use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::BolaoStore;
use crate::api_error::ApiError;
use crate::models::{Competition, Match, Prediction, RawConfig, ScoringConfig, User};

#[derive(Debug, Default)]
struct Collections {
    competitions: BTreeMap<String, Competition>,
    users: BTreeMap<String, User>,
    matches: BTreeMap<String, Match>,
    /// Keyed by (user id, match id)
    predictions: BTreeMap<(String, String), Prediction>,
    config: Option<RawConfig>,
}

/// Store backed by process memory. Used when no database is configured and
/// by the test suite.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Collections>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, ApiError> {
        self.inner
            .read()
            .map_err(|_| ApiError::internal_error("In-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, ApiError> {
        self.inner
            .write()
            .map_err(|_| ApiError::internal_error("In-memory store lock poisoned"))
    }

    #[cfg(test)]
    pub fn insert_user(&self, user: User) -> Result<(), ApiError> {
        self.write()?.users.insert(user.id.clone(), user);
        Ok(())
    }

    #[cfg(test)]
    pub fn insert_match(&self, game: Match) -> Result<(), ApiError> {
        self.write()?.matches.insert(game.id.clone(), game);
        Ok(())
    }

    /// Store a configuration document verbatim, legacy shape included
    #[cfg(test)]
    pub fn put_raw_config(&self, raw: RawConfig) -> Result<(), ApiError> {
        self.write()?.config = Some(raw);
        Ok(())
    }
}

#[async_trait]
impl BolaoStore for InMemoryStore {
    async fn list_competitions(&self) -> Result<Vec<Competition>, ApiError> {
        Ok(self.read()?.competitions.values().cloned().collect())
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.read()?.users.values().cloned().collect())
    }

    async fn list_matches(&self) -> Result<Vec<Match>, ApiError> {
        Ok(self.read()?.matches.values().cloned().collect())
    }

    async fn list_predictions(&self) -> Result<Vec<Prediction>, ApiError> {
        Ok(self.read()?.predictions.values().cloned().collect())
    }

    async fn fetch_match(&self, match_id: &str) -> Result<Option<Match>, ApiError> {
        Ok(self.read()?.matches.get(match_id).cloned())
    }

    async fn fetch_user(&self, user_id: &str) -> Result<Option<User>, ApiError> {
        Ok(self.read()?.users.get(user_id).cloned())
    }

    async fn upsert_prediction(&self, prediction: &Prediction) -> Result<(), ApiError> {
        self.write()?
            .predictions
            .insert(
                (prediction.user_id.clone(), prediction.match_id.clone()),
                prediction.clone(),
            );
        Ok(())
    }

    async fn save_match(&self, game: &Match) -> Result<(), ApiError> {
        self.write()?.matches.insert(game.id.clone(), game.clone());
        Ok(())
    }

    async fn delete_match(&self, match_id: &str) -> Result<bool, ApiError> {
        Ok(self.write()?.matches.remove(match_id).is_some())
    }

    async fn save_user(&self, user: &User) -> Result<(), ApiError> {
        self.write()?.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn save_competition(&self, competition: &Competition) -> Result<(), ApiError> {
        self.write()?
            .competitions
            .insert(competition.id.clone(), competition.clone());
        Ok(())
    }

    async fn load_raw_config(&self) -> Result<Option<RawConfig>, ApiError> {
        Ok(self.read()?.config.clone())
    }

    async fn save_config(&self, config: &ScoringConfig) -> Result<(), ApiError> {
        let mut collections = self.write()?;

        // Merge semantics: legacy fields already stored are left in place
        let mut raw = collections.config.take().unwrap_or_default();
        let fresh = RawConfig::from(config);
        raw.max_goals = fresh.max_goals;
        raw.weights = fresh.weights;
        raw.championship_phase_weights = fresh.championship_phase_weights;
        collections.config = Some(raw);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ApiError> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scoreline;
    use chrono::Utc;

    #[tokio::test]
    async fn test_upsert_replaces_by_composite_key() {
        let store = InMemoryStore::new();

        let first = Prediction::new("u1", "g1", Scoreline::new(1, 0), vec![], Utc::now());
        let second = Prediction::new("u1", "g1", Scoreline::new(3, 2), vec![], Utc::now());
        store.upsert_prediction(&first).await.unwrap();
        store.upsert_prediction(&second).await.unwrap();

        let predictions = store.list_predictions().await.unwrap();
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].scoreline(), Scoreline::new(3, 2));
    }

    #[tokio::test]
    async fn test_delete_match_reports_absence() {
        let store = InMemoryStore::new();
        let game: Match = serde_json::from_value(serde_json::json!({
            "id": "g1",
            "competition_id": "carioca",
            "opponent": "Vasco",
            "kickoff": "2025-03-16T21:00:00Z",
            "status": "upcoming",
            "location": null,
            "club_score": null,
            "opponent_score": null
        }))
        .unwrap();
        store.save_match(&game).await.unwrap();

        assert!(store.delete_match("g1").await.unwrap());
        assert!(!store.delete_match("g1").await.unwrap());
    }

    #[tokio::test]
    async fn test_save_config_keeps_legacy_fields() {
        let store = InMemoryStore::new();
        store
            .put_raw_config(RawConfig {
                championship_weights: Some(BTreeMap::from([("carioca".to_string(), 0.5)])),
                ..RawConfig::default()
            })
            .unwrap();

        store.save_config(&ScoringConfig::default()).await.unwrap();

        let raw = store.load_raw_config().await.unwrap().unwrap();
        assert!(raw.championship_weights.is_some());
        assert_eq!(raw.max_goals, Some(20));
    }
}
