//! Runtime representation of a single court's match state.

use time::OffsetDateTime;

use crate::config::PlaceholderNames;
use crate::dao::models::{GameStateEntity, PlayerEntity, SetRecordEntity};

/// Scoring mode for a court: first to 21 (capped at 30) or first to 15
/// (capped at 21).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub enum GameMode {
    /// Standard rally scoring to 21 points, hard cap at 30.
    #[serde(rename = "21")]
    TwentyOne,
    /// Short-format scoring to 15 points, hard cap at 21.
    #[serde(rename = "15")]
    Fifteen,
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::TwentyOne
    }
}

/// Scoring rules derived from a [`GameMode`], consumed uniformly by the win
/// handler and the rest break checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameModePolicy {
    /// Score that wins a set when leading by two.
    pub win_score: u8,
    /// Score that wins a set outright regardless of margin.
    pub max_score: u8,
    /// Whether reaching 11 points pauses play for a one-minute break.
    pub eleven_point_break: bool,
    /// Whether a won set is followed by a two-minute interval break.
    pub interval_break: bool,
}

impl GameMode {
    /// Resolve the scoring policy for this mode.
    pub fn policy(self) -> GameModePolicy {
        match self {
            GameMode::TwentyOne => GameModePolicy {
                win_score: 21,
                max_score: 30,
                eleven_point_break: true,
                interval_break: true,
            },
            GameMode::Fifteen => GameModePolicy {
                win_score: 15,
                max_score: 21,
                eleven_point_break: false,
                interval_break: false,
            },
        }
    }
}

/// Identifies one of the two player slots on the control panel.
///
/// Slots are positional: [`switch_sides`](MatchState::swap_sides) relabels
/// which player occupies which slot, so a slot is not a stable identity
/// across a whole match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The `player1` slot.
    One,
    /// The `player2` slot.
    Two,
}

impl Side {
    /// The slot on the other half of the court.
    pub fn opponent(self) -> Side {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }
}

/// One player (or doubles pair) occupying a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSlot {
    /// Display name of the player.
    pub name: String,
    /// Doubles partner name; absent in singles.
    pub partner: Option<String>,
    /// Points in the current set.
    pub score: u8,
    /// Sets won so far this match.
    pub games: u8,
}

impl PlayerSlot {
    fn named(name: &str, partner: &str) -> Self {
        Self {
            name: name.to_owned(),
            partner: Some(partner.to_owned()),
            score: 0,
            games: 0,
        }
    }
}

/// Final score of a completed set, captured with the names that occupied each
/// slot at the moment the set ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetRecord {
    /// Name in the `player1` slot when the set was recorded.
    pub player1_name: String,
    /// Doubles partner in the `player1` slot, if any.
    pub player1_partner: Option<String>,
    /// Name in the `player2` slot when the set was recorded.
    pub player2_name: String,
    /// Doubles partner in the `player2` slot, if any.
    pub player2_partner: Option<String>,
    /// Final score rendered as `"P1-P2"`, e.g. `"21-10"`.
    pub score: String,
}

impl SetRecord {
    /// Parse the `"P1-P2"` score string back into the two point totals.
    pub fn parse_score(&self) -> Option<(u8, u8)> {
        let (left, right) = self.score.split_once('-')?;
        Some((left.parse().ok()?, right.parse().ok()?))
    }
}

/// Aggregated per-court match state, mutated exclusively through the match
/// engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    /// Player occupying the `player1` slot.
    pub player1: PlayerSlot,
    /// Player occupying the `player2` slot.
    pub player2: PlayerSlot,
    /// Stamped once on the first point of the match; authoritative start of
    /// the elapsed-time computation.
    pub match_start: Option<OffsetDateTime>,
    /// Stamped when the match is won; cleared again when the winning set is
    /// undone.
    pub match_end: Option<OffsetDateTime>,
    /// Court activity flag as last seen from the backend.
    pub is_active: bool,
    /// Doubles toggle; reveals the partner name fields.
    pub is_doubles: bool,
    /// Scoring mode for this court.
    pub game_mode: GameMode,
    /// True once sides have been swapped at 11 points in a 1-1 decider.
    pub deciding_game_switched: bool,
    /// Completed sets, oldest first; append-only except for explicit undo.
    pub set_history: Vec<SetRecord>,
    /// True once the 11-point break has been taken in the current set.
    pub rest_break_taken: bool,
    /// Terminal lock; freezes all score mutation once confirmed.
    pub match_completed: bool,
}

impl MatchState {
    /// Fresh state with placeholder names and zeroed scores.
    pub fn with_placeholders(names: &PlaceholderNames) -> Self {
        Self {
            player1: PlayerSlot::named(&names.player1, &names.partner1),
            player2: PlayerSlot::named(&names.player2, &names.partner2),
            match_start: None,
            match_end: None,
            is_active: false,
            is_doubles: false,
            game_mode: GameMode::default(),
            deciding_game_switched: false,
            set_history: Vec::new(),
            rest_break_taken: false,
            match_completed: false,
        }
    }

    /// Shared access to the slot identified by `side`.
    pub fn player(&self, side: Side) -> &PlayerSlot {
        match side {
            Side::One => &self.player1,
            Side::Two => &self.player2,
        }
    }

    /// Mutable access to the slot identified by `side`.
    pub fn player_mut(&mut self, side: Side) -> &mut PlayerSlot {
        match side {
            Side::One => &mut self.player1,
            Side::Two => &mut self.player2,
        }
    }

    /// Atomically relabel the two slots, swapping names, partners, scores and
    /// games in one step.
    pub fn swap_sides(&mut self) {
        std::mem::swap(&mut self.player1, &mut self.player2);
    }

    /// Whether any scoring has happened this match.
    pub fn has_activity(&self) -> bool {
        self.player1.score > 0
            || self.player2.score > 0
            || self.player1.games > 0
            || self.player2.games > 0
            || self.match_start.is_some()
    }

    /// Capture a [`SetRecord`] for the set that just ended with the current
    /// slot occupants and scores.
    pub fn record_current_set(&mut self) {
        let record = SetRecord {
            player1_name: self.player1.name.clone(),
            player1_partner: self.player1.partner.clone(),
            player2_name: self.player2.name.clone(),
            player2_partner: self.player2.partner.clone(),
            score: format!("{}-{}", self.player1.score, self.player2.score),
        };
        self.set_history.push(record);
    }
}

impl From<PlayerEntity> for PlayerSlot {
    fn from(value: PlayerEntity) -> Self {
        Self {
            name: value.name,
            partner: value.partner,
            score: value.score,
            games: value.games,
        }
    }
}

impl From<PlayerSlot> for PlayerEntity {
    fn from(value: PlayerSlot) -> Self {
        Self {
            name: value.name,
            partner: value.partner,
            score: value.score,
            games: value.games,
        }
    }
}

impl From<SetRecordEntity> for SetRecord {
    fn from(value: SetRecordEntity) -> Self {
        Self {
            player1_name: value.player1_name,
            player1_partner: value.player1_partner,
            player2_name: value.player2_name,
            player2_partner: value.player2_partner,
            score: value.score,
        }
    }
}

impl From<SetRecord> for SetRecordEntity {
    fn from(value: SetRecord) -> Self {
        Self {
            player1_name: value.player1_name,
            player1_partner: value.player1_partner,
            player2_name: value.player2_name,
            player2_partner: value.player2_partner,
            score: value.score,
        }
    }
}

impl MatchState {
    /// Rebuild runtime state from a persisted entity plus the court-level
    /// flags that are stored separately.
    pub fn from_entity(
        entity: GameStateEntity,
        is_active: bool,
        is_doubles: bool,
        game_mode: GameMode,
    ) -> Self {
        Self {
            player1: entity.player1.into(),
            player2: entity.player2.into(),
            match_start: entity.match_start,
            match_end: entity.match_end,
            is_active,
            is_doubles,
            game_mode,
            deciding_game_switched: entity.deciding_game_switched,
            set_history: entity.set_history.into_iter().map(Into::into).collect(),
            rest_break_taken: entity.rest_break_taken,
            match_completed: entity.match_completed,
        }
    }
}
