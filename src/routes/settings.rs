use axum::{Json, Router, extract::State, routing::get, routing::put};
use axum_valid::Valid;

use crate::{
    dto::settings::{CourtCountUpdate, SettingsResponse},
    error::AppError,
    services::settings_service,
    state::SharedState,
};

/// Global settings endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/settings", get(get_settings))
        .route("/settings/court-count", put(set_court_count))
}

#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    responses((status = 200, description = "Global scoreboard settings", body = SettingsResponse))
)]
/// Return the court count and client-facing configuration flags.
pub async fn get_settings(
    State(state): State<SharedState>,
) -> Result<Json<SettingsResponse>, AppError> {
    Ok(Json(settings_service::get_settings(&state).await?))
}

#[utoipa::path(
    put,
    path = "/settings/court-count",
    tag = "settings",
    request_body = CourtCountUpdate,
    responses(
        (status = 200, description = "Courts provisioned", body = SettingsResponse),
        (status = 400, description = "Count out of range")
    )
)]
/// Provision or remove courts so exactly the requested number exist.
pub async fn set_court_count(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CourtCountUpdate>>,
) -> Result<Json<SettingsResponse>, AppError> {
    Ok(Json(
        settings_service::set_court_count(&state, payload).await?,
    ))
}
