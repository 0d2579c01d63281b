use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Match status - admin-driven, forward-only lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Upcoming,
    Live,
    Finished,
}

impl MatchStatus {
    /// Check if a forward transition to another status is valid
    pub fn can_transition_to(&self, to: &MatchStatus) -> bool {
        match (self, to) {
            (MatchStatus::Upcoming, MatchStatus::Live) => true,
            (MatchStatus::Live, MatchStatus::Finished) => true,
            // A result can be entered in one go, skipping the live phase
            (MatchStatus::Upcoming, MatchStatus::Finished) => true,
            (a, b) if a == b => true,
            _ => false,
        }
    }

    pub fn valid_next_states(&self) -> Vec<MatchStatus> {
        match self {
            MatchStatus::Upcoming => vec![MatchStatus::Live, MatchStatus::Finished],
            MatchStatus::Live => vec![MatchStatus::Finished],
            MatchStatus::Finished => vec![],
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Finished)
    }

    /// Predictions may only be created or edited while the match is upcoming
    pub fn accepts_predictions(&self) -> bool {
        matches!(self, MatchStatus::Upcoming)
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Upcoming => write!(f, "upcoming"),
            MatchStatus::Live => write!(f, "live"),
            MatchStatus::Finished => write!(f, "finished"),
        }
    }
}

/// Competition phase, one axis of the scoring multiplier table
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type,
)]
#[sqlx(type_name = "VARCHAR")]
pub enum Phase {
    #[default]
    #[serde(rename = "regular")]
    #[sqlx(rename = "regular")]
    Regular,
    #[serde(rename = "round_of_16", alias = "oitavas")]
    #[sqlx(rename = "round_of_16")]
    RoundOf16,
    #[serde(rename = "quarterfinal", alias = "quartas")]
    #[sqlx(rename = "quarterfinal")]
    Quarterfinal,
    #[serde(rename = "semifinal", alias = "semi")]
    #[sqlx(rename = "semifinal")]
    Semifinal,
    #[serde(rename = "final")]
    #[sqlx(rename = "final")]
    Final,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Regular,
        Phase::RoundOf16,
        Phase::Quarterfinal,
        Phase::Semifinal,
        Phase::Final,
    ];
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Regular => write!(f, "regular"),
            Phase::RoundOf16 => write!(f, "round_of_16"),
            Phase::Quarterfinal => write!(f, "quarterfinal"),
            Phase::Semifinal => write!(f, "semifinal"),
            Phase::Final => write!(f, "final"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    #[default]
    #[serde(alias = "mandante")]
    Home,
    #[serde(alias = "visitante")]
    Away,
}

/// Match result classification from the club's perspective
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

/// A club-vs-opponent score, either predicted or actual
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scoreline {
    pub club: i32,
    pub opponent: i32,
}

impl Scoreline {
    pub fn new(club: i32, opponent: i32) -> Self {
        Self { club, opponent }
    }

    pub fn outcome(&self) -> Outcome {
        match self.club.cmp(&self.opponent) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::Loss,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Match {
    pub id: String,
    pub competition_id: String,
    pub opponent: String,
    pub kickoff: DateTime<Utc>,
    pub status: MatchStatus,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub venue: Venue,
    pub location: Option<String>,
    pub club_score: Option<i32>,
    pub opponent_score: Option<i32>,
    #[serde(default)]
    pub scorers: Vec<String>,
}

impl Match {
    /// Reported score, present only once both sides have been entered
    pub fn final_score(&self) -> Option<Scoreline> {
        match (self.club_score, self.opponent_score) {
            (Some(club), Some(opponent)) => Some(Scoreline::new(club, opponent)),
            _ => None,
        }
    }

    /// Finished with a complete score: the only state in which points are awarded
    pub fn is_scorable(&self) -> bool {
        self.status == MatchStatus::Finished && self.final_score().is_some()
    }
}

/// Admin match creation. New matches start upcoming with no score.
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct CreateMatchDTO {
    #[validate(length(min = 1, message = "Competition is required"))]
    pub competition_id: String,
    #[validate(length(min = 1, message = "Opponent is required"))]
    pub opponent: String,
    pub kickoff: DateTime<Utc>,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub venue: Venue,
    pub location: Option<String>,
}

impl Match {
    pub fn from_dto(id: String, dto: CreateMatchDTO) -> Self {
        let location = dto
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        Self {
            id,
            competition_id: dto.competition_id.trim().to_string(),
            opponent: dto.opponent.trim().to_string(),
            kickoff: dto.kickoff,
            status: MatchStatus::Upcoming,
            phase: dto.phase,
            venue: dto.venue,
            location,
            club_score: None,
            opponent_score: None,
            scorers: Vec::new(),
        }
    }
}

/// Admin result entry: status change plus optional score and scorers
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct UpdateResultDTO {
    pub status: MatchStatus,
    #[validate(range(min = 0, message = "Scores cannot be negative"))]
    pub club_score: Option<i32>,
    #[validate(range(min = 0, message = "Scores cannot be negative"))]
    pub opponent_score: Option<i32>,
    #[serde(default)]
    pub scorers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_status_transitions() {
        let upcoming = MatchStatus::Upcoming;
        let live = MatchStatus::Live;
        let finished = MatchStatus::Finished;

        assert!(upcoming.can_transition_to(&live));
        assert!(live.can_transition_to(&finished));
        assert!(upcoming.can_transition_to(&finished));

        // Idempotent (same state)
        assert!(live.can_transition_to(&live));
        assert!(finished.can_transition_to(&finished));

        // Backward moves are not modelled transitions
        assert!(!live.can_transition_to(&upcoming));
        assert!(!finished.can_transition_to(&live));
        assert!(!finished.can_transition_to(&upcoming));
    }

    #[test]
    fn test_terminal_and_next_states() {
        assert!(MatchStatus::Finished.is_terminal());
        assert!(!MatchStatus::Live.is_terminal());
        assert_eq!(MatchStatus::Live.valid_next_states(), vec![MatchStatus::Finished]);
        assert_eq!(MatchStatus::Finished.valid_next_states(), vec![]);
    }

    #[test]
    fn test_only_upcoming_accepts_predictions() {
        assert!(MatchStatus::Upcoming.accepts_predictions());
        assert!(!MatchStatus::Live.accepts_predictions());
        assert!(!MatchStatus::Finished.accepts_predictions());
    }

    #[test]
    fn test_outcome_classification() {
        assert_eq!(Scoreline::new(2, 1).outcome(), Outcome::Win);
        assert_eq!(Scoreline::new(2, 2).outcome(), Outcome::Draw);
        assert_eq!(Scoreline::new(0, 3).outcome(), Outcome::Loss);
    }

    #[test]
    fn test_legacy_phase_and_venue_names() {
        let phase: Phase = serde_json::from_str("\"oitavas\"").unwrap();
        assert_eq!(phase, Phase::RoundOf16);
        let phase: Phase = serde_json::from_str("\"semi\"").unwrap();
        assert_eq!(phase, Phase::Semifinal);
        assert_eq!(serde_json::to_string(&Phase::Quarterfinal).unwrap(), "\"quarterfinal\"");

        let venue: Venue = serde_json::from_str("\"visitante\"").unwrap();
        assert_eq!(venue, Venue::Away);
    }

    #[test]
    fn test_created_match_starts_upcoming() {
        let dto = CreateMatchDTO {
            competition_id: " carioca ".to_string(),
            opponent: "Vasco".to_string(),
            kickoff: "2025-03-16T21:00:00Z".parse().unwrap(),
            phase: Phase::Final,
            venue: Venue::Away,
            location: Some("   ".to_string()),
        };
        assert!(dto.validate().is_ok());

        let game = Match::from_dto("g1".to_string(), dto);
        assert_eq!(game.status, MatchStatus::Upcoming);
        assert_eq!(game.competition_id, "carioca");
        assert_eq!(game.phase, Phase::Final);
        assert!(game.location.is_none());
        assert!(game.final_score().is_none());
    }

    #[test]
    fn test_missing_phase_defaults_to_regular() {
        let json = serde_json::json!({
            "id": "g1",
            "competition_id": "brasileirao",
            "opponent": "Palmeiras",
            "kickoff": "2025-05-04T19:00:00Z",
            "status": "upcoming",
            "location": null,
            "club_score": null,
            "opponent_score": null
        });
        let game: Match = serde_json::from_value(json).unwrap();
        assert_eq!(game.phase, Phase::Regular);
        assert_eq!(game.venue, Venue::Home);
        assert!(game.scorers.is_empty());
        assert!(game.final_score().is_none());
        assert!(!game.is_scorable());
    }

    #[test]
    fn test_update_result_dto_validation() {
        let valid = UpdateResultDTO {
            status: MatchStatus::Finished,
            club_score: Some(2),
            opponent_score: Some(0),
            scorers: vec!["p9".to_string()],
        };
        assert!(valid.validate().is_ok());

        let invalid = UpdateResultDTO {
            status: MatchStatus::Finished,
            club_score: Some(-1),
            opponent_score: Some(0),
            scorers: vec![],
        };
        assert!(invalid.validate().is_err());
    }
}
