use std::time::SystemTime;

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::dao::models::{CourtEntity, GameStateEntity, MatchRecordEntity};
use crate::state::match_state::GameMode;

/// Court record keyed by its public court number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtDocument {
    #[serde(rename = "_id")]
    pub number: i32,
    pub is_active: bool,
    pub is_doubles: bool,
    pub game_mode: GameMode,
}

impl From<CourtEntity> for CourtDocument {
    fn from(value: CourtEntity) -> Self {
        Self {
            number: value.number as i32,
            is_active: value.is_active,
            is_doubles: value.is_doubles,
            game_mode: value.game_mode,
        }
    }
}

impl From<CourtDocument> for CourtEntity {
    fn from(value: CourtDocument) -> Self {
        Self {
            number: value.number as u16,
            is_active: value.is_active,
            is_doubles: value.is_doubles,
            game_mode: value.game_mode,
        }
    }
}

/// Game state document keyed by court number; the state payload keeps the
/// entity's wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateDocument {
    #[serde(rename = "_id")]
    pub court_number: i32,
    pub state: GameStateEntity,
}

/// Match history record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecordDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub court_number: i32,
    pub winner_name: String,
    pub loser_name: String,
    pub games_won: String,
    pub duration: String,
    pub set_scores: Option<String>,
    pub match_date: DateTime,
}

impl From<MatchRecordEntity> for MatchRecordDocument {
    fn from(value: MatchRecordEntity) -> Self {
        Self {
            id: value.id,
            court_number: value.court_number as i32,
            winner_name: value.winner_name,
            loser_name: value.loser_name,
            games_won: value.games_won,
            duration: value.duration,
            set_scores: value.set_scores,
            match_date: DateTime::from_system_time(SystemTime::from(value.match_date)),
        }
    }
}

impl From<MatchRecordDocument> for MatchRecordEntity {
    fn from(value: MatchRecordDocument) -> Self {
        Self {
            id: value.id,
            court_number: value.court_number as u16,
            winner_name: value.winner_name,
            loser_name: value.loser_name,
            games_won: value.games_won,
            duration: value.duration,
            set_scores: value.set_scores,
            match_date: OffsetDateTime::from(value.match_date.to_system_time()),
        }
    }
}
