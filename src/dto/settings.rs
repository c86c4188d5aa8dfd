//! Wire contract for global scoreboard settings.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Global configuration returned by `GET /settings`, consumed by clients to
/// validate court numbers and lay out overview pages.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    /// Number of provisioned courts.
    pub court_count: u16,
    /// Whether court panels should offer the clear-court button.
    pub show_reset_button: bool,
}

/// Body for `PUT /settings/court-count`.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CourtCountUpdate {
    /// Desired number of courts.
    #[validate(range(min = 1, max = 20))]
    pub court_count: u16,
}
