//! Ranking aggregation
//!
//! Folds every prediction for every finished match into per-user totals,
//! per-competition subtotals and an exact-score counter. Always recomputed
//! in full from a snapshot.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

use crate::api_error::ApiError;
use crate::models::{Match, Prediction, ScoringConfig, Snapshot, User};
use crate::service::config_service::ConfigService;
use crate::service::ranking_presentation::{
    evolution, participant_summary, ranking_table, Evolution, ParticipantSummary, RankingTable,
};
use crate::service::scoring_service::score;
use crate::store::BolaoStore;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub user_id: String,
    pub name: String,
    pub per_competition: BTreeMap<String, f64>,
    pub grand_total: f64,
    pub exact_score_count: u32,
}

impl RankingEntry {
    fn empty(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            per_competition: BTreeMap::new(),
            grand_total: 0.0,
            exact_score_count: 0,
        }
    }

    pub fn competition_total(&self, competition_id: &str) -> f64 {
        self.per_competition.get(competition_id).copied().unwrap_or(0.0)
    }
}

/// Aggregate points for all users, ordered best first.
///
/// Every registered user appears, even without predictions. Predictions
/// referencing unknown users or matches are skipped. Ties are broken by
/// exact-score count (more first), then user id.
pub fn aggregate(
    users: &[User],
    matches: &[Match],
    predictions: &[Prediction],
    config: &ScoringConfig,
) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = Vec::with_capacity(users.len());
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(users.len());
    for user in users {
        if slots.contains_key(user.id.as_str()) {
            continue;
        }
        slots.insert(user.id.as_str(), entries.len());
        entries.push(RankingEntry::empty(user));
    }

    let mut by_match: HashMap<&str, Vec<&Prediction>> = HashMap::new();
    for prediction in predictions {
        by_match
            .entry(prediction.match_id.as_str())
            .or_default()
            .push(prediction);
    }

    let mut scored = 0usize;
    let mut orphaned = 0usize;

    for game in matches.iter().filter(|m| m.is_scorable()) {
        let Some(match_predictions) = by_match.get(game.id.as_str()) else {
            continue;
        };

        for prediction in match_predictions {
            let Some(&slot) = slots.get(prediction.user_id.as_str()) else {
                orphaned += 1;
                continue;
            };
            let Some(result) = score(prediction, game, config) else {
                continue;
            };

            let entry = &mut entries[slot];
            *entry
                .per_competition
                .entry(game.competition_id.clone())
                .or_insert(0.0) += result.points;
            entry.grand_total += result.points;
            if result.is_exact() {
                entry.exact_score_count += 1;
            }
            scored += 1;
        }
    }

    sort_ranking(&mut entries);

    debug!(
        users = entries.len(),
        scored_predictions = scored,
        orphaned_predictions = orphaned,
        "Ranking aggregated"
    );

    entries
}

fn sort_ranking(entries: &mut [RankingEntry]) {
    entries.sort_by(|a, b| {
        b.grand_total
            .total_cmp(&a.grand_total)
            .then_with(|| b.exact_score_count.cmp(&a.exact_score_count))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
}

/// Builds rankings and charts from fresh store snapshots
#[derive(Clone)]
pub struct RankingService {
    store: Arc<dyn BolaoStore>,
    config_service: ConfigService,
    chart_limit: usize,
}

impl RankingService {
    pub fn new(store: Arc<dyn BolaoStore>, config_service: ConfigService, chart_limit: usize) -> Self {
        Self {
            store,
            config_service,
            chart_limit,
        }
    }

    /// Read a complete snapshot from the store
    pub async fn snapshot(&self) -> Result<Snapshot, ApiError> {
        Ok(Snapshot {
            competitions: self.store.list_competitions().await?,
            users: self.store.list_users().await?,
            matches: self.store.list_matches().await?,
            predictions: self.store.list_predictions().await?,
            config: self.config_service.load().await?,
        })
    }

    pub async fn ranking(&self) -> Result<RankingTable, ApiError> {
        let snapshot = self.snapshot().await?;
        Ok(ranking_table(&snapshot))
    }

    pub async fn evolution(&self) -> Result<Evolution, ApiError> {
        let snapshot = self.snapshot().await?;
        let ranking = aggregate(
            &snapshot.users,
            &snapshot.matches,
            &snapshot.predictions,
            &snapshot.config,
        );
        Ok(evolution(&snapshot, &ranking, self.chart_limit))
    }

    pub async fn participant(&self, user_id: &str) -> Result<ParticipantSummary, ApiError> {
        let snapshot = self.snapshot().await?;
        participant_summary(&snapshot, user_id).ok_or_else(|| ApiError::not_found("User not found"))
    }
}
