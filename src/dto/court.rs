//! Wire contract for court administration.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::models::{CourtEntity, CourtUpdateEntity};
use crate::state::match_state::GameMode;

/// Court record as exposed to admin and overview clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourtSummary {
    /// Public court number (1-based).
    pub court_number: u16,
    /// Whether the court is shown on TV/overview displays.
    pub is_active: bool,
    /// Doubles mode toggle.
    pub is_doubles: bool,
    /// Scoring mode for this court.
    pub game_mode: GameMode,
}

impl From<CourtEntity> for CourtSummary {
    fn from(value: CourtEntity) -> Self {
        Self {
            court_number: value.number,
            is_active: value.is_active,
            is_doubles: value.is_doubles,
            game_mode: value.game_mode,
        }
    }
}

/// Partial update body for `PUT /courts/{courtId}`; omitted fields are left
/// untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourtUpdateRequest {
    /// New activity flag.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// New doubles flag.
    #[serde(default)]
    pub is_doubles: Option<bool>,
    /// New scoring mode.
    #[serde(default)]
    pub game_mode: Option<GameMode>,
}

impl From<CourtUpdateRequest> for CourtUpdateEntity {
    fn from(value: CourtUpdateRequest) -> Self {
        Self {
            is_active: value.is_active,
            is_doubles: value.is_doubles,
            game_mode: value.game_mode,
        }
    }
}
