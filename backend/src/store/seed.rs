//! Startup fixture loader
//!
//! A seed file is a JSON document with optional `competitions`, `users`,
//! `matches` and `config` sections. Every record goes through the regular
//! store writes, so loading the same file twice leaves the same state.

use serde::Deserialize;
use std::path::Path;
use tracing::info;

use super::BolaoStore;
use crate::api_error::ApiError;
use crate::models::{Competition, Match, ScoringConfig, User};

#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub competitions: Vec<Competition>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub config: Option<ScoringConfig>,
}

impl Seed {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read seed file {}: {}", path.display(), e))?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, anyhow::Error> {
        let seed: Seed = serde_json::from_str(contents)?;
        if let Some(config) = &seed.config {
            let errors = config.validation_errors();
            if !errors.is_empty() {
                anyhow::bail!("Seed scoring config is invalid: {}", errors.join("; "));
            }
        }
        Ok(seed)
    }

    pub async fn apply(&self, store: &dyn BolaoStore) -> Result<(), ApiError> {
        for competition in &self.competitions {
            store.save_competition(competition).await?;
        }
        for user in &self.users {
            store.save_user(user).await?;
        }
        for game in &self.matches {
            store.save_match(game).await?;
        }
        if let Some(config) = &self.config {
            store.save_config(config).await?;
        }

        info!(
            competitions = self.competitions.len(),
            users = self.users.len(),
            matches = self.matches.len(),
            config = self.config.is_some(),
            "Seed data loaded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchStatus, Role};
    use crate::store::InMemoryStore;

    const SEED: &str = r#"{
        "competitions": [{ "id": "carioca", "name": "Campeonato Carioca" }],
        "users": [
            { "id": "admin_flamengo_com", "name": "Admin", "email": "admin@flamengo.com", "role": "admin" },
            { "id": "zico_flamengo_com", "name": "Zico", "email": "zico@flamengo.com" }
        ],
        "matches": [{
            "id": "g1",
            "competition_id": "carioca",
            "opponent": "Vasco",
            "kickoff": "2025-03-16T21:00:00Z",
            "status": "upcoming",
            "phase": "final",
            "location": "Maracanã",
            "club_score": null,
            "opponent_score": null
        }]
    }"#;

    #[tokio::test]
    async fn test_apply_populates_store() {
        let store = InMemoryStore::new();
        let seed = Seed::from_json(SEED).unwrap();
        seed.apply(&store).await.unwrap();
        // Reapplying is harmless
        seed.apply(&store).await.unwrap();

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().any(|u| u.role == Role::Admin));
        assert!(users.iter().any(|u| u.id == "zico_flamengo_com" && u.role == Role::Participant));

        let game = store.fetch_match("g1").await.unwrap().unwrap();
        assert_eq!(game.status, MatchStatus::Upcoming);
        assert!(game.scorers.is_empty());

        assert_eq!(store.list_competitions().await.unwrap().len(), 1);
        assert!(store.load_raw_config().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bundled_seed_has_an_admin() {
        let store = InMemoryStore::new();
        let seed = Seed::from_json(include_str!("../../seed/bolao.json")).unwrap();
        seed.apply(&store).await.unwrap();

        let users = store.list_users().await.unwrap();
        assert!(users.iter().any(|u| u.is_admin()));
        assert_eq!(store.list_competitions().await.unwrap().len(), 4);
    }

    #[test]
    fn test_empty_document_is_an_empty_seed() {
        let seed = Seed::from_json("{}").unwrap();
        assert!(seed.users.is_empty() && seed.matches.is_empty() && seed.config.is_none());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = Seed::from_json(
            r#"{ "config": {
                "maxGoals": 0,
                "weights": { "exactScore": 10, "correctResult": 3, "correctGoals": 2, "correctScorers": 5 }
            } }"#,
        );
        let message = result.unwrap_err().to_string();
        assert!(message.contains("maxGoals"), "{}", message);
    }
}
