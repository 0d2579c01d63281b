//! Views derived from a snapshot and its ranking: the ranking table with
//! score bands, the evolution chart and the per-participant summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{Competition, Match, Prediction, Snapshot};
use crate::service::ranking_service::{aggregate, RankingEntry};
use crate::service::scoring_service::{score, Criterion};

const HIGH_BAND_PERCENTILE: f64 = 0.7;
const MEDIUM_BAND_PERCENTILE: f64 = 0.3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

/// Band of `score` within the spread of its column
pub fn score_band(score: f64, column_scores: &[f64]) -> ScoreBand {
    let min = column_scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = column_scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if !range.is_finite() || range <= 0.0 {
        return ScoreBand::Medium;
    }

    let percentile = (score - min) / range;
    if percentile >= HIGH_BAND_PERCENTILE {
        ScoreBand::High
    } else if percentile >= MEDIUM_BAND_PERCENTILE {
        ScoreBand::Medium
    } else {
        ScoreBand::Low
    }
}

/// Registered competitions, then any competition only referenced by a match
pub fn ranking_columns(snapshot: &Snapshot) -> Vec<Competition> {
    let mut columns = snapshot.competitions.clone();
    let registered: BTreeSet<&str> = snapshot.competitions.iter().map(|c| c.id.as_str()).collect();

    let unregistered: BTreeSet<&str> = snapshot
        .matches
        .iter()
        .map(|m| m.competition_id.as_str())
        .filter(|id| !registered.contains(id))
        .collect();

    columns.extend(unregistered.into_iter().map(Competition::from_unregistered_id));
    columns
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankedRow {
    /// 1-based
    pub position: usize,
    #[serde(flatten)]
    pub entry: RankingEntry,
    /// Band per competition column, keyed by competition id
    pub bands: BTreeMap<String, ScoreBand>,
    pub total_band: ScoreBand,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankingTable {
    pub columns: Vec<Competition>,
    pub entries: Vec<RankedRow>,
}

pub fn ranking_table(snapshot: &Snapshot) -> RankingTable {
    let ranking = aggregate(
        &snapshot.users,
        &snapshot.matches,
        &snapshot.predictions,
        &snapshot.config,
    );
    let columns = ranking_columns(snapshot);

    let column_scores: HashMap<&str, Vec<f64>> = columns
        .iter()
        .map(|column| {
            let scores = ranking
                .iter()
                .map(|entry| entry.competition_total(&column.id))
                .collect();
            (column.id.as_str(), scores)
        })
        .collect();
    let totals: Vec<f64> = ranking.iter().map(|entry| entry.grand_total).collect();

    let entries = ranking
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let bands = columns
                .iter()
                .map(|column| {
                    let scores = column_scores
                        .get(column.id.as_str())
                        .map(Vec::as_slice)
                        .unwrap_or_default();
                    (
                        column.id.clone(),
                        score_band(entry.competition_total(&column.id), scores),
                    )
                })
                .collect();

            RankedRow {
                position: index + 1,
                entry: entry.clone(),
                bands,
                total_band: score_band(entry.grand_total, &totals),
            }
        })
        .collect();

    RankingTable { columns, entries }
}

/// One x-axis point of a chart: a finished match
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchLabel {
    pub match_id: String,
    pub opponent: String,
    pub kickoff: DateTime<Utc>,
}

impl From<&Match> for MatchLabel {
    fn from(game: &Match) -> Self {
        Self {
            match_id: game.id.clone(),
            opponent: game.opponent.clone(),
            kickoff: game.kickoff,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionSeries {
    pub user_id: String,
    pub name: String,
    /// Cumulative points after each labelled match
    pub points: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evolution {
    pub labels: Vec<MatchLabel>,
    pub series: Vec<EvolutionSeries>,
}

fn predictions_by_pair(predictions: &[Prediction]) -> HashMap<(&str, &str), &Prediction> {
    predictions
        .iter()
        .map(|p| ((p.user_id.as_str(), p.match_id.as_str()), p))
        .collect()
}

/// Cumulative series for the top `limit` users of `ranking`
pub fn evolution(snapshot: &Snapshot, ranking: &[RankingEntry], limit: usize) -> Evolution {
    let matches = snapshot.scorable_matches();
    let predictions = predictions_by_pair(&snapshot.predictions);

    let series = ranking
        .iter()
        .take(limit)
        .map(|entry| {
            let mut total = 0.0;
            let points = matches
                .iter()
                .map(|game| {
                    if let Some(result) = predictions
                        .get(&(entry.user_id.as_str(), game.id.as_str()))
                        .and_then(|prediction| score(prediction, game, &snapshot.config))
                    {
                        total += result.points;
                    }
                    total
                })
                .collect();

            EvolutionSeries {
                user_id: entry.user_id.clone(),
                name: entry.name.clone(),
                points,
            }
        })
        .collect();

    Evolution {
        labels: matches.into_iter().map(MatchLabel::from).collect(),
        series,
    }
}

/// How often each criterion fired for one participant
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaCounts {
    pub exact_score: u32,
    pub correct_result: u32,
    pub correct_goals: u32,
    /// Predictions with at least one correct scorer
    pub correct_scorers: u32,
}

impl CriteriaCounts {
    fn record(&mut self, criterion: Criterion) {
        match criterion {
            Criterion::ExactScore => self.exact_score += 1,
            Criterion::CorrectResult => self.correct_result += 1,
            Criterion::CorrectGoals => self.correct_goals += 1,
            Criterion::CorrectScorers => self.correct_scorers += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub user_id: String,
    pub name: String,
    pub labels: Vec<MatchLabel>,
    pub cumulative_points: Vec<f64>,
    /// Keyed by competition display name
    pub points_by_competition: BTreeMap<String, f64>,
    pub criteria: CriteriaCounts,
    pub total: f64,
}

/// Breakdown charts for one user, or `None` if the user is unknown
pub fn participant_summary(snapshot: &Snapshot, user_id: &str) -> Option<ParticipantSummary> {
    let user = snapshot.find_user(user_id)?;
    let matches = snapshot.scorable_matches();
    let predictions = predictions_by_pair(&snapshot.predictions);
    let names: HashMap<String, String> = ranking_columns(snapshot)
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let mut total = 0.0;
    let mut cumulative_points = Vec::with_capacity(matches.len());
    let mut points_by_competition = BTreeMap::new();
    let mut criteria = CriteriaCounts::default();

    for game in &matches {
        let result = predictions
            .get(&(user_id, game.id.as_str()))
            .and_then(|prediction| score(prediction, game, &snapshot.config));

        if let Some(result) = result {
            total += result.points;
            let name = names
                .get(&game.competition_id)
                .cloned()
                .unwrap_or_else(|| game.competition_id.clone());
            *points_by_competition.entry(name).or_insert(0.0) += result.points;
            for criterion in &result.criteria {
                criteria.record(*criterion);
            }
        }

        cumulative_points.push(total);
    }

    Some(ParticipantSummary {
        user_id: user.id.clone(),
        name: user.name.clone(),
        labels: matches.into_iter().map(MatchLabel::from).collect(),
        cumulative_points,
        points_by_competition,
        criteria,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchStatus, Phase, Role, Scoreline, ScoringConfig, User, Venue};
    use chrono::{Duration, TimeZone};

    fn user(id: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", id),
            role: Role::Participant,
        }
    }

    fn finished(id: &str, competition: &str, day: i64, club: i32, opponent: i32) -> Match {
        Match {
            id: id.to_string(),
            competition_id: competition.to_string(),
            opponent: format!("Rival {}", id),
            kickoff: Utc.with_ymd_and_hms(2025, 2, 1, 18, 0, 0).unwrap() + Duration::days(day),
            status: MatchStatus::Finished,
            phase: Phase::Regular,
            venue: Venue::Home,
            location: None,
            club_score: Some(club),
            opponent_score: Some(opponent),
            scorers: vec!["pedro".to_string()],
        }
    }

    fn bet(user_id: &str, match_id: &str, club: i32, opponent: i32, scorers: &[&str]) -> Prediction {
        Prediction::new(
            user_id,
            match_id,
            Scoreline::new(club, opponent),
            scorers.iter().map(|s| s.to_string()).collect(),
            Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap(),
        )
    }

    fn snapshot() -> Snapshot {
        let mut upcoming = finished("g9", "brasileirao", 30, 0, 0);
        upcoming.status = MatchStatus::Upcoming;
        upcoming.club_score = None;
        upcoming.opponent_score = None;

        Snapshot {
            competitions: vec![Competition {
                id: "brasileirao".to_string(),
                name: "Brasileirão".to_string(),
            }],
            users: vec![user("u1", "Zico"), user("u2", "Adílio"), user("u3", "Júnior")],
            // stored out of chronological order on purpose
            matches: vec![
                finished("g2", "copa_do_brasil", 2, 1, 1),
                finished("g1", "brasileirao", 1, 2, 0),
                upcoming,
            ],
            predictions: vec![
                bet("u1", "g1", 2, 0, &["pedro"]), // 10 + 5
                bet("u1", "g2", 0, 0, &[]),        // 3
                bet("u2", "g1", 1, 0, &[]),        // 3
                bet("u2", "g2", 1, 1, &[]),        // 10
                bet("u3", "g9", 1, 0, &[]),
            ],
            config: ScoringConfig::default(),
        }
    }

    #[test]
    fn test_score_band_percentiles() {
        let column = [0.0, 5.0, 10.0];
        assert_eq!(score_band(10.0, &column), ScoreBand::High);
        assert_eq!(score_band(7.0, &column), ScoreBand::High);
        assert_eq!(score_band(5.0, &column), ScoreBand::Medium);
        assert_eq!(score_band(3.0, &column), ScoreBand::Medium);
        assert_eq!(score_band(2.0, &column), ScoreBand::Low);
    }

    #[test]
    fn test_score_band_zero_range_is_medium() {
        assert_eq!(score_band(4.0, &[4.0, 4.0]), ScoreBand::Medium);
        assert_eq!(score_band(0.0, &[]), ScoreBand::Medium);
    }

    #[test]
    fn test_unregistered_competitions_become_columns() {
        let columns = ranking_columns(&snapshot());
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Brasileirão", "Copa Do Brasil"]);
    }

    #[test]
    fn test_ranking_table_positions_and_bands() {
        let table = ranking_table(&snapshot());

        let order: Vec<(&str, usize)> = table
            .entries
            .iter()
            .map(|row| (row.entry.user_id.as_str(), row.position))
            .collect();
        assert_eq!(order, vec![("u1", 1), ("u2", 2), ("u3", 3)]);

        let leader = &table.entries[0];
        assert_eq!(leader.entry.grand_total, 18.0);
        assert_eq!(leader.total_band, ScoreBand::High);
        assert_eq!(leader.bands["brasileirao"], ScoreBand::High);
        assert_eq!(leader.bands["copa_do_brasil"], ScoreBand::Medium);

        let last = &table.entries[2];
        assert_eq!(last.entry.grand_total, 0.0);
        assert_eq!(last.total_band, ScoreBand::Low);
    }

    #[test]
    fn test_evolution_is_chronological_and_cumulative() {
        let snap = snapshot();
        let ranking = aggregate(&snap.users, &snap.matches, &snap.predictions, &snap.config);
        let chart = evolution(&snap, &ranking, 10);

        let labels: Vec<&str> = chart.labels.iter().map(|l| l.match_id.as_str()).collect();
        assert_eq!(labels, vec!["g1", "g2"]);

        assert_eq!(chart.series.len(), 3);
        assert_eq!(chart.series[0].user_id, "u1");
        assert_eq!(chart.series[0].points, vec![15.0, 18.0]);
        assert_eq!(chart.series[1].points, vec![3.0, 13.0]);
        assert_eq!(chart.series[2].points, vec![0.0, 0.0]);
    }

    #[test]
    fn test_evolution_limits_series_to_leaders() {
        let snap = snapshot();
        let ranking = aggregate(&snap.users, &snap.matches, &snap.predictions, &snap.config);

        let chart = evolution(&snap, &ranking, 1);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].user_id, "u1");
        assert_eq!(chart.labels.len(), 2);
    }

    #[test]
    fn test_participant_summary() {
        let summary = participant_summary(&snapshot(), "u1").unwrap();

        assert_eq!(summary.name, "Zico");
        assert_eq!(summary.cumulative_points, vec![15.0, 18.0]);
        assert_eq!(summary.total, 18.0);
        assert_eq!(summary.points_by_competition["Brasileirão"], 15.0);
        assert_eq!(summary.points_by_competition["Copa Do Brasil"], 3.0);
        assert_eq!(
            summary.criteria,
            CriteriaCounts {
                exact_score: 1,
                correct_result: 1,
                correct_goals: 0,
                correct_scorers: 1,
            }
        );
    }

    #[test]
    fn test_participant_summary_unknown_user() {
        assert!(participant_summary(&snapshot(), "ghost").is_none());
    }
}
