use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::state::match_state::GameMode;

/// One player (or doubles pair) as persisted inside a game state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Display name of the player.
    pub name: String,
    /// Doubles partner name; absent in singles.
    pub partner: Option<String>,
    /// Points in the current set.
    pub score: u8,
    /// Sets won so far this match.
    pub games: u8,
}

/// Final score of a completed set with the names that held each slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetRecordEntity {
    /// Name in the `player1` slot when the set ended.
    pub player1_name: String,
    /// Doubles partner in the `player1` slot, if any.
    pub player1_partner: Option<String>,
    /// Name in the `player2` slot when the set ended.
    pub player2_name: String,
    /// Doubles partner in the `player2` slot, if any.
    pub player2_partner: Option<String>,
    /// Final score rendered as `"P1-P2"`.
    pub score: String,
}

/// Per-court game state persisted by the storage layer.
///
/// Court-level flags (`is_active`, `game_mode`) live on [`CourtEntity`] and
/// are merged into reads by the service layer; `is_doubles` is mirrored here
/// because the scorer writes it alongside the scores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameStateEntity {
    /// Player occupying the `player1` slot.
    pub player1: PlayerEntity,
    /// Player occupying the `player2` slot.
    pub player2: PlayerEntity,
    /// Derived display timer; the timestamps below are authoritative.
    pub timer_seconds: u64,
    /// When the first point of the match was scored.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub match_start: Option<OffsetDateTime>,
    /// When the match was won; absent while play continues.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub match_end: Option<OffsetDateTime>,
    /// True once sides have swapped at 11 points in a 1-1 decider.
    pub deciding_game_switched: bool,
    /// Doubles toggle as last written by the scorer.
    pub is_doubles: bool,
    /// Completed sets, oldest first.
    pub set_history: Vec<SetRecordEntity>,
    /// Whether a rest break countdown is currently running.
    pub rest_break_active: bool,
    /// Seconds remaining in the running break, 0 when idle.
    pub rest_break_seconds_left: u32,
    /// Title displayed while the break runs.
    pub rest_break_title: Option<String>,
    /// Whether the 11-point break has been taken in the current set.
    pub rest_break_taken: bool,
    /// Terminal lock set once the match result was confirmed.
    pub match_completed: bool,
}

impl GameStateEntity {
    /// Default placeholder state for a court with no stored game yet.
    pub fn placeholder(player1: PlayerEntity, player2: PlayerEntity) -> Self {
        Self {
            player1,
            player2,
            timer_seconds: 0,
            match_start: None,
            match_end: None,
            deciding_game_switched: false,
            is_doubles: false,
            set_history: Vec::new(),
            rest_break_active: false,
            rest_break_seconds_left: 0,
            rest_break_title: None,
            rest_break_taken: false,
            match_completed: false,
        }
    }

    /// Whether any score, set, or timer field indicates gameplay.
    pub fn has_activity(&self) -> bool {
        self.player1.score > 0
            || self.player2.score > 0
            || self.player1.games > 0
            || self.player2.games > 0
            || self.timer_seconds > 0
            || self.match_start.is_some()
    }
}

/// Court record carrying the administrator-controlled flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourtEntity {
    /// Public court number (1-based), the key clients address courts by.
    pub number: u16,
    /// Whether the court is shown on TV/overview displays.
    pub is_active: bool,
    /// Doubles mode toggle.
    pub is_doubles: bool,
    /// Scoring mode for this court.
    pub game_mode: GameMode,
}

impl CourtEntity {
    /// Fresh inactive singles court in the default scoring mode.
    pub fn new(number: u16) -> Self {
        Self {
            number,
            is_active: false,
            is_doubles: false,
            game_mode: GameMode::default(),
        }
    }
}

/// Partial update applied to a court record; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourtUpdateEntity {
    /// New activity flag.
    pub is_active: Option<bool>,
    /// New doubles flag.
    pub is_doubles: Option<bool>,
    /// New scoring mode.
    pub game_mode: Option<GameMode>,
}

/// Completed match pushed to the history log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchRecordEntity {
    /// Primary key of the record.
    pub id: Uuid,
    /// Court the match was played on.
    pub court_number: u16,
    /// Name of the winning player/pair.
    pub winner_name: String,
    /// Name of the losing player/pair.
    pub loser_name: String,
    /// Sets tally as `"2-0"` or `"2-1"`.
    pub games_won: String,
    /// Formatted match duration.
    pub duration: String,
    /// Concatenated per-set scores, if recorded.
    pub set_scores: Option<String>,
    /// When the record was written.
    #[serde(with = "time::serde::rfc3339")]
    pub match_date: OffsetDateTime,
}
