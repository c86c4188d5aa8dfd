//! Wire contract for the match history log.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dao::models::MatchRecordEntity;

/// Body for `POST /match-history`, pushed by a scorer once the operator
/// confirms a finished match.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MatchResultRequest {
    /// Court the match was played on.
    pub court_id: u16,
    /// Name of the winning player/pair.
    #[validate(length(min = 1, max = 64))]
    pub winner_name: String,
    /// Name of the losing player/pair.
    #[validate(length(min = 1, max = 64))]
    pub loser_name: String,
    /// Sets tally as `"2-0"` or `"2-1"`.
    #[validate(length(min = 1, max = 8))]
    pub games_won: String,
    /// Formatted match duration.
    #[validate(length(min = 1, max = 16))]
    pub duration: String,
    /// Concatenated per-set scores.
    #[serde(default)]
    pub set_scores: Option<String>,
}

/// Match record as returned by the history endpoints.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecordResponse {
    /// Primary key of the record.
    pub id: Uuid,
    /// Court the match was played on.
    pub court_id: u16,
    /// Name of the winning player/pair.
    pub winner_name: String,
    /// Name of the losing player/pair.
    pub loser_name: String,
    /// Sets tally.
    pub games_won: String,
    /// Formatted match duration.
    pub duration: String,
    /// Concatenated per-set scores, if recorded.
    pub set_scores: Option<String>,
    /// When the record was written.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub match_date: OffsetDateTime,
}

impl From<MatchRecordEntity> for MatchRecordResponse {
    fn from(value: MatchRecordEntity) -> Self {
        Self {
            id: value.id,
            court_id: value.court_number,
            winner_name: value.winner_name,
            loser_name: value.loser_name,
            games_won: value.games_won,
            duration: value.duration,
            set_scores: value.set_scores,
            match_date: value.match_date,
        }
    }
}

/// Pagination query accepted by the history listing endpoints.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Maximum number of records to return.
    #[serde(default)]
    pub limit: Option<usize>,
    /// Records to skip from the newest end.
    #[serde(default)]
    pub offset: Option<usize>,
}
