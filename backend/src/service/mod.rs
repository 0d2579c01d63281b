// Service layer module for the prediction pool
pub mod scoring_service;
pub mod config_service;
pub mod prediction_service;
pub mod match_service;
pub mod user_service;
pub mod ranking_service;
pub mod ranking_presentation;

#[cfg(test)]
mod prediction_service_test;

pub use config_service::ConfigService;
pub use prediction_service::PredictionService;
pub use match_service::MatchService;
pub use user_service::UserService;
pub use ranking_service::RankingService;
