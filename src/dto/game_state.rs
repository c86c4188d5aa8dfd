//! Wire contract for per-court game state reads and upserts.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use time::OffsetDateTime;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::dao::models::{CourtEntity, GameStateEntity, PlayerEntity, SetRecordEntity};
use crate::dto::validation::validate_set_score;
use crate::state::match_state::GameMode;

/// One player (or doubles pair) on the wire.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct PlayerPayload {
    /// Display name; an empty value falls back to the court placeholder.
    #[validate(length(max = 64))]
    pub name: String,
    /// Doubles partner name.
    #[serde(default)]
    #[validate(length(max = 64))]
    pub name2: Option<String>,
    /// Points in the current set.
    #[serde(default)]
    pub score: u8,
    /// Sets won so far this match.
    #[serde(default)]
    pub games: u8,
}

impl From<PlayerEntity> for PlayerPayload {
    fn from(value: PlayerEntity) -> Self {
        Self {
            name: value.name,
            name2: value.partner,
            score: value.score,
            games: value.games,
        }
    }
}

impl From<PlayerPayload> for PlayerEntity {
    fn from(value: PlayerPayload) -> Self {
        Self {
            name: value.name,
            partner: value.name2,
            score: value.score,
            games: value.games,
        }
    }
}

/// One completed set as stored in `setScoresHistory`.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetRecordPayload {
    /// Name in the `player1` slot when the set ended.
    pub player1_name: String,
    /// Doubles partner in the `player1` slot.
    #[serde(default)]
    pub player1_name2: Option<String>,
    /// Name in the `player2` slot when the set ended.
    pub player2_name: String,
    /// Doubles partner in the `player2` slot.
    #[serde(default)]
    pub player2_name2: Option<String>,
    /// Final score rendered as `"P1-P2"`.
    pub score: String,
}

impl Validate for SetRecordPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(err) = validate_set_score(&self.score) {
            errors.add("score", err);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl From<SetRecordEntity> for SetRecordPayload {
    fn from(value: SetRecordEntity) -> Self {
        Self {
            player1_name: value.player1_name,
            player1_name2: value.player1_partner,
            player2_name: value.player2_name,
            player2_name2: value.player2_partner,
            score: value.score,
        }
    }
}

impl From<SetRecordPayload> for SetRecordEntity {
    fn from(value: SetRecordPayload) -> Self {
        Self {
            player1_name: value.player1_name,
            player1_partner: value.player1_name2,
            player2_name: value.player2_name,
            player2_partner: value.player2_name2,
            score: value.score,
        }
    }
}

/// Upsert body for `PUT /game-states/{courtId}`.
///
/// Every field except the two players is optional so older scorers that only
/// push names, scores and the timer keep working.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GameStateUpdate {
    /// Player occupying the `player1` slot.
    #[validate(nested)]
    pub player1: PlayerPayload,
    /// Player occupying the `player2` slot.
    #[validate(nested)]
    pub player2: PlayerPayload,
    /// Derived display timer.
    #[serde(default)]
    pub timer_seconds: u64,
    /// When the first point of the match was scored.
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub match_start_time: Option<OffsetDateTime>,
    /// When the match was won.
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub match_end_time: Option<OffsetDateTime>,
    /// True once sides have swapped at 11 points in a 1-1 decider.
    #[serde(default)]
    pub deciding_game_switched: bool,
    /// Doubles toggle as seen by the scorer.
    #[serde(default)]
    pub is_doubles: bool,
    /// Completed sets, oldest first.
    #[serde(default)]
    #[validate(nested)]
    pub set_scores_history: Vec<SetRecordPayload>,
    /// Whether a rest break countdown is running.
    #[serde(default)]
    pub rest_break_active: bool,
    /// Seconds remaining in the running break.
    #[serde(default)]
    pub rest_break_seconds_left: u32,
    /// Title displayed while the break runs.
    #[serde(default)]
    pub rest_break_title: Option<String>,
    /// Whether the 11-point break has been taken this set.
    #[serde(default)]
    pub rest_break_taken: bool,
    /// Terminal lock set once the match result was confirmed.
    #[serde(default)]
    pub match_completed: bool,
}

impl From<GameStateUpdate> for GameStateEntity {
    fn from(value: GameStateUpdate) -> Self {
        Self {
            player1: value.player1.into(),
            player2: value.player2.into(),
            timer_seconds: value.timer_seconds,
            match_start: value.match_start_time,
            match_end: value.match_end_time,
            deciding_game_switched: value.deciding_game_switched,
            is_doubles: value.is_doubles,
            set_history: value
                .set_scores_history
                .into_iter()
                .map(Into::into)
                .collect(),
            rest_break_active: value.rest_break_active,
            rest_break_seconds_left: value.rest_break_seconds_left,
            rest_break_title: value.rest_break_title,
            rest_break_taken: value.rest_break_taken,
            match_completed: value.match_completed,
        }
    }
}

impl From<GameStateEntity> for GameStateUpdate {
    fn from(value: GameStateEntity) -> Self {
        Self {
            player1: value.player1.into(),
            player2: value.player2.into(),
            timer_seconds: value.timer_seconds,
            match_start_time: value.match_start,
            match_end_time: value.match_end,
            deciding_game_switched: value.deciding_game_switched,
            is_doubles: value.is_doubles,
            set_scores_history: value.set_history.into_iter().map(Into::into).collect(),
            rest_break_active: value.rest_break_active,
            rest_break_seconds_left: value.rest_break_seconds_left,
            rest_break_title: value.rest_break_title,
            rest_break_taken: value.rest_break_taken,
            match_completed: value.match_completed,
        }
    }
}

/// Query parameters accepted by `PUT /game-states/{courtId}`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct SaveQuery {
    /// Suppress the automatic mark-active derivation, used by administrator
    /// edits so concurrent gameplay writes do not override the explicit
    /// activity flag.
    #[serde(default)]
    pub skip_auto_active: bool,
}

/// Full game state returned by `GET /game-states/{courtId}`: the stored state
/// merged with the court record's administrative flags.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameStateResponse {
    /// Player occupying the `player1` slot.
    pub player1: PlayerPayload,
    /// Player occupying the `player2` slot.
    pub player2: PlayerPayload,
    /// Derived display timer.
    pub timer_seconds: u64,
    /// When the first point of the match was scored.
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub match_start_time: Option<OffsetDateTime>,
    /// When the match was won.
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub match_end_time: Option<OffsetDateTime>,
    /// True once sides have swapped at 11 points in a 1-1 decider.
    pub deciding_game_switched: bool,
    /// Completed sets, oldest first.
    pub set_scores_history: Vec<SetRecordPayload>,
    /// Whether a rest break countdown is running.
    pub rest_break_active: bool,
    /// Seconds remaining in the running break.
    pub rest_break_seconds_left: u32,
    /// Title displayed while the break runs.
    pub rest_break_title: Option<String>,
    /// Whether the 11-point break has been taken this set.
    pub rest_break_taken: bool,
    /// Terminal lock set once the match result was confirmed.
    pub match_completed: bool,
    /// Court activity flag from the court record.
    pub is_active: bool,
    /// Doubles flag from the court record.
    pub is_doubles: bool,
    /// Scoring mode from the court record.
    pub game_mode: GameMode,
}

impl From<GameStateResponse> for GameStateEntity {
    fn from(value: GameStateResponse) -> Self {
        Self {
            player1: value.player1.into(),
            player2: value.player2.into(),
            timer_seconds: value.timer_seconds,
            match_start: value.match_start_time,
            match_end: value.match_end_time,
            deciding_game_switched: value.deciding_game_switched,
            is_doubles: value.is_doubles,
            set_history: value.set_scores_history.into_iter().map(Into::into).collect(),
            rest_break_active: value.rest_break_active,
            rest_break_seconds_left: value.rest_break_seconds_left,
            rest_break_title: value.rest_break_title,
            rest_break_taken: value.rest_break_taken,
            match_completed: value.match_completed,
        }
    }
}

impl GameStateResponse {
    /// Merge a stored (or placeholder) game state with its court record.
    pub fn from_parts(state: GameStateEntity, court: &CourtEntity) -> Self {
        Self {
            player1: state.player1.into(),
            player2: state.player2.into(),
            timer_seconds: state.timer_seconds,
            match_start_time: state.match_start,
            match_end_time: state.match_end,
            deciding_game_switched: state.deciding_game_switched,
            set_scores_history: state.set_history.into_iter().map(Into::into).collect(),
            rest_break_active: state.rest_break_active,
            rest_break_seconds_left: state.rest_break_seconds_left,
            rest_break_title: state.rest_break_title,
            rest_break_taken: state.rest_break_taken,
            match_completed: state.match_completed,
            is_active: court.is_active,
            is_doubles: court.is_doubles,
            game_mode: court.game_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_accepts_minimal_legacy_payload() {
        let update: GameStateUpdate = serde_json::from_str(
            r#"{
                "player1": {"name": "Anna", "score": 3, "games": 0},
                "player2": {"name": "Bo"},
                "timerSeconds": 42,
                "decidingGameSwitched": false
            }"#,
        )
        .unwrap();

        assert_eq!(update.player1.score, 3);
        assert_eq!(update.player2.score, 0);
        assert_eq!(update.timer_seconds, 42);
        assert!(update.set_scores_history.is_empty());
        assert!(!update.match_completed);
        assert!(update.validate().is_ok());
    }

    #[test]
    fn update_rejects_malformed_set_score() {
        let update: GameStateUpdate = serde_json::from_str(
            r#"{
                "player1": {"name": "Anna"},
                "player2": {"name": "Bo"},
                "setScoresHistory": [
                    {"player1Name": "Anna", "player2Name": "Bo", "score": "21:10"}
                ]
            }"#,
        )
        .unwrap();

        assert!(update.validate().is_err());
    }

    #[test]
    fn response_uses_camel_case_wire_names() {
        let court = CourtEntity::new(1);
        let state = GameStateEntity::placeholder(
            PlayerEntity {
                name: "Anna".into(),
                partner: None,
                score: 0,
                games: 0,
            },
            PlayerEntity {
                name: "Bo".into(),
                partner: None,
                score: 0,
                games: 0,
            },
        );

        let response = GameStateResponse::from_parts(state, &court);
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("timerSeconds").is_some());
        assert!(json.get("setScoresHistory").is_some());
        assert!(json.get("gameMode").is_some());
        assert_eq!(json["gameMode"], "21");
        // Absent timestamps are omitted entirely rather than serialized as null.
        assert!(json.get("matchStartTime").is_none());
    }
}
