// Core models
pub mod competition;
pub mod user;
pub mod match_model;
pub mod prediction;
pub mod scoring_config;
pub mod snapshot;

// Re-export commonly used types
pub use competition::*;
pub use user::*;
pub use match_model::*;
pub use prediction::*;
pub use scoring_config::*;
pub use snapshot::*;
