#[cfg(test)]
mod tests {
    use crate::api_error::ApiError;
    use crate::models::*;
    use crate::service::config_service::ConfigService;
    use crate::service::prediction_service::PredictionService;
    use crate::store::{BolaoStore, InMemoryStore};
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            name: id.to_string(),
            email: format!("{}@example.com", id),
            role,
        }
    }

    fn game(id: &str, status: MatchStatus) -> Match {
        Match {
            id: id.to_string(),
            competition_id: "brasileirao".to_string(),
            opponent: "Botafogo".to_string(),
            kickoff: Utc::now() + Duration::days(1),
            status,
            phase: Phase::Regular,
            venue: Venue::Away,
            location: Some("Nilton Santos".to_string()),
            club_score: None,
            opponent_score: None,
            scorers: vec![],
        }
    }

    /// Helper to create a service over a seeded in-memory store
    fn create_test_service() -> (Arc<InMemoryStore>, PredictionService) {
        let store = Arc::new(InMemoryStore::new());
        store.insert_user(user("u1", Role::Participant)).unwrap();
        store.insert_user(user("u2", Role::Participant)).unwrap();
        store.insert_match(game("g1", MatchStatus::Upcoming)).unwrap();

        let config_service = ConfigService::new(store.clone());
        let service = PredictionService::new(store.clone(), config_service);
        (store, service)
    }

    fn dto(club: i32, opponent: i32, scorers: &[&str]) -> SubmitPredictionDTO {
        SubmitPredictionDTO {
            club_score: club,
            opponent_score: opponent,
            scorers: scorers.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_submit_and_resubmit_last_writer_wins() {
        let (store, service) = create_test_service();

        service.submit("u1", "g1", dto(1, 0, &["pedro"])).await.unwrap();
        let saved = service.submit("u1", "g1", dto(2, 2, &[])).await.unwrap();

        assert_eq!(saved.id, "u1_g1");
        let stored = store.list_predictions().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].scoreline(), Scoreline::new(2, 2));
        assert!(stored[0].scorers.is_empty());
    }

    #[tokio::test]
    async fn test_underscored_ids_keep_separate_predictions() {
        let (store, service) = create_test_service();
        store.insert_user(user("ana_1", Role::Participant)).unwrap();
        store.insert_user(user("ana", Role::Participant)).unwrap();
        store.insert_match(game("g", MatchStatus::Upcoming)).unwrap();
        store.insert_match(game("1_g", MatchStatus::Upcoming)).unwrap();

        service.submit("ana_1", "g", dto(1, 0, &[])).await.unwrap();
        service.submit("ana", "1_g", dto(0, 2, &[])).await.unwrap();

        let stored = store.list_predictions().await.unwrap();
        let mut pairs: Vec<(&str, &str, i32)> = stored
            .iter()
            .map(|p| (p.user_id.as_str(), p.match_id.as_str(), p.club_score))
            .collect();
        pairs.sort();
        assert_eq!(pairs, vec![("ana", "1_g", 0), ("ana_1", "g", 1)]);
    }

    #[tokio::test]
    async fn test_submit_after_kickoff_is_rejected_as_unavailable() {
        let (store, service) = create_test_service();

        // The user loaded the match while upcoming; the admin starts it before submit
        let mut started = store.fetch_match("g1").await.unwrap().unwrap();
        started.status = MatchStatus::Live;
        store.save_match(&started).await.unwrap();

        let result = service.submit("u1", "g1", dto(1, 0, &[])).await;
        match result {
            Err(ApiError::MatchUnavailable { match_id, status }) => {
                assert_eq!(match_id, "g1");
                assert_eq!(status, "live");
            }
            other => panic!("expected MatchUnavailable, got {:?}", other),
        }
        assert!(store.list_predictions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_validation_errors() {
        let (_, service) = create_test_service();

        let negative = service.submit("u1", "g1", dto(-1, 0, &[])).await;
        assert!(matches!(negative, Err(ApiError::ValidationError(_))));

        let too_many = service.submit("u1", "g1", dto(1, 0, &["pedro", "bruno"])).await;
        assert!(matches!(too_many, Err(ApiError::ValidationError(_))));

        let no_goals = service.submit("u1", "g1", dto(0, 1, &["pedro"])).await;
        assert!(matches!(no_goals, Err(ApiError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_blank_scorers_are_dropped() {
        let (_, service) = create_test_service();

        let saved = service
            .submit("u1", "g1", dto(0, 0, &["", "  "]))
            .await
            .unwrap();
        assert!(saved.scorers.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_or_match() {
        let (_, service) = create_test_service();

        let result = service.submit("ghost", "g1", dto(1, 0, &[])).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));

        let result = service.submit("u1", "g404", dto(1, 0, &[])).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_predictions_hidden_until_kickoff() {
        let (store, service) = create_test_service();
        service.submit("u1", "g1", dto(1, 0, &[])).await.unwrap();

        let hidden = service.for_match("g1").await;
        assert!(matches!(hidden, Err(ApiError::Forbidden(_))));

        let mut live = store.fetch_match("g1").await.unwrap().unwrap();
        live.status = MatchStatus::Live;
        store.save_match(&live).await.unwrap();

        let revealed = service.for_match("g1").await.unwrap();
        assert_eq!(revealed.predictions.len(), 1);
        assert!(revealed.predictions[0].result.is_none());
    }

    #[tokio::test]
    async fn test_finished_predictions_are_scored() {
        let (store, service) = create_test_service();
        service.submit("u1", "g1", dto(2, 1, &["pedro"])).await.unwrap();
        service.submit("u2", "g1", dto(0, 1, &[])).await.unwrap();

        let mut finished = store.fetch_match("g1").await.unwrap().unwrap();
        finished.status = MatchStatus::Finished;
        finished.club_score = Some(2);
        finished.opponent_score = Some(1);
        finished.scorers = vec!["pedro".to_string(), "arrascaeta".to_string()];
        store.save_match(&finished).await.unwrap();

        let mine = service.for_user("u1").await.unwrap();
        assert_eq!(mine.len(), 1);
        let result = mine[0].result.as_ref().unwrap();
        assert_eq!(result.points, 15.0);
        assert!(result.is_exact());

        let everyone = service.for_match("g1").await.unwrap();
        let points: Vec<f64> = everyone
            .predictions
            .iter()
            .map(|p| p.result.as_ref().map(|r| r.points).unwrap_or_default())
            .collect();
        // u2: wrong result, opponent goal count right
        assert_eq!(points, vec![15.0, 2.0]);
    }

    #[test]
    fn test_submit_blocks_on_current_thread() {
        let (_, service) = create_test_service();
        let saved = tokio_test::block_on(service.submit("u2", "g1", dto(3, 1, &["pedro"])));
        assert_eq!(saved.unwrap().id, "u2_g1");
    }
}
