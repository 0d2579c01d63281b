pub mod health;
pub mod config_handler;
pub mod match_handler;
pub mod prediction_handler;
pub mod ranking_handler;
pub mod user_handler;

use actix_web::{web, HttpRequest};
use std::sync::Arc;

use crate::api_error::ApiError;
use crate::service::{ConfigService, MatchService, PredictionService, RankingService, UserService};
use crate::store::BolaoStore;

/// Header carrying the acting user's id
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Application state shared by all handlers
pub struct AppState {
    pub store: Arc<dyn BolaoStore>,
    pub config_service: ConfigService,
    pub prediction_service: PredictionService,
    pub match_service: MatchService,
    pub ranking_service: RankingService,
    pub user_service: UserService,
}

impl AppState {
    pub fn new(store: Arc<dyn BolaoStore>, chart_limit: usize) -> Self {
        let config_service = ConfigService::new(store.clone());
        Self {
            prediction_service: PredictionService::new(store.clone(), config_service.clone()),
            match_service: MatchService::new(store.clone()),
            ranking_service: RankingService::new(store.clone(), config_service.clone(), chart_limit),
            user_service: UserService::new(store.clone()),
            config_service,
            store,
        }
    }
}

/// Id of the user making the request
pub fn actor_id(req: &HttpRequest) -> Result<String, ApiError> {
    req.headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request(format!("Missing {} header", USER_ID_HEADER)))
}

/// Register the `/api` routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/ranking", web::get().to(ranking_handler::get_ranking))
            .route("/ranking/evolution", web::get().to(ranking_handler::get_evolution))
            .route(
                "/ranking/participants/{user_id}",
                web::get().to(ranking_handler::get_participant),
            )
            .route("/matches", web::get().to(match_handler::list_matches))
            .route("/matches", web::post().to(match_handler::create_match))
            .route(
                "/matches/{match_id}",
                web::delete().to(match_handler::delete_match),
            )
            .route(
                "/matches/{match_id}/prediction",
                web::post().to(prediction_handler::submit_prediction),
            )
            .route(
                "/matches/{match_id}/predictions",
                web::get().to(prediction_handler::match_predictions),
            )
            .route(
                "/matches/{match_id}/result",
                web::put().to(match_handler::update_result),
            )
            .route(
                "/users/{user_id}/predictions",
                web::get().to(prediction_handler::user_predictions),
            )
            .route("/competitions", web::post().to(match_handler::save_competition))
            .route("/users", web::post().to(user_handler::invite_user))
            .route("/config", web::get().to(config_handler::get_config))
            .route("/config", web::put().to(config_handler::update_config)),
    );
}
