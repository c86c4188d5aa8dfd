use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::court::{CourtSummary, CourtUpdateRequest},
    error::AppError,
    services::court_service,
    state::SharedState,
};

/// Court administration endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/courts", get(list_courts))
        .route("/courts/{courtId}", get(get_court).put(update_court))
}

#[utoipa::path(
    get,
    path = "/courts",
    tag = "courts",
    responses((status = 200, description = "All provisioned courts", body = [CourtSummary]))
)]
/// List all courts with their activity, doubles and game-mode flags.
pub async fn list_courts(
    State(state): State<SharedState>,
) -> Result<Json<Vec<CourtSummary>>, AppError> {
    Ok(Json(court_service::list_courts(&state).await?))
}

#[utoipa::path(
    get,
    path = "/courts/{courtId}",
    tag = "courts",
    params(("courtId" = u16, Path, description = "Public court number")),
    responses(
        (status = 200, description = "Court record", body = CourtSummary),
        (status = 404, description = "Unknown court")
    )
)]
/// Return a single court record.
pub async fn get_court(
    State(state): State<SharedState>,
    Path(court_id): Path<u16>,
) -> Result<Json<CourtSummary>, AppError> {
    Ok(Json(court_service::get_court(&state, court_id).await?))
}

#[utoipa::path(
    put,
    path = "/courts/{courtId}",
    tag = "courts",
    params(("courtId" = u16, Path, description = "Public court number")),
    request_body = CourtUpdateRequest,
    responses(
        (status = 200, description = "Updated court record", body = CourtSummary),
        (status = 404, description = "Unknown court")
    )
)]
/// Toggle the activity, doubles or game-mode flags of a court.
pub async fn update_court(
    State(state): State<SharedState>,
    Path(court_id): Path<u16>,
    Json(payload): Json<CourtUpdateRequest>,
) -> Result<Json<CourtSummary>, AppError> {
    Ok(Json(
        court_service::update_court(&state, court_id, payload).await?,
    ))
}
