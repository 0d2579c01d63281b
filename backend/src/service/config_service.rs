use std::sync::Arc;
use tracing::{info, warn};

use crate::api_error::ApiError;
use crate::models::{migrate_config, ScoringConfig};
use crate::service::user_service::require_admin;
use crate::store::BolaoStore;

/// Loads, migrates and saves the scoring configuration singleton
#[derive(Clone)]
pub struct ConfigService {
    store: Arc<dyn BolaoStore>,
}

impl ConfigService {
    pub fn new(store: Arc<dyn BolaoStore>) -> Self {
        Self { store }
    }

    /// Current configuration.
    ///
    /// Legacy documents are migrated to the two-axis table and the result is
    /// persisted, so each competition is migrated once.
    pub async fn load(&self) -> Result<ScoringConfig, ApiError> {
        let Some(raw) = self.store.load_raw_config().await? else {
            return Ok(ScoringConfig::default());
        };

        let migration = migrate_config(&raw);
        if migration.needs_persist() {
            info!(
                competitions = ?migration.migrated,
                "Migrating legacy competition weights to phase table"
            );
            // A failed write only means the migration runs again next load
            if let Err(e) = self.store.save_config(&migration.config).await {
                warn!(error = %e, "Failed to persist migrated configuration");
            }
        }

        Ok(migration.config)
    }

    /// Replace the configuration (admin only)
    pub async fn save(&self, actor_id: &str, config: ScoringConfig) -> Result<ScoringConfig, ApiError> {
        require_admin(self.store.as_ref(), actor_id, "change the scoring configuration").await?;

        let errors = config.validation_errors();
        if !errors.is_empty() {
            return Err(ApiError::validation(errors.join("; ")));
        }

        self.store.save_config(&config).await?;

        info!(
            user_id = %actor_id,
            competitions = config.championship_phase_weights.len(),
            "Scoring configuration saved"
        );

        Ok(config)
    }
}
