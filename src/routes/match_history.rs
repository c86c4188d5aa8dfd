use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::match_history::{HistoryQuery, MatchRecordResponse, MatchResultRequest},
    error::AppError,
    services::match_history_service,
    state::SharedState,
};

/// Match history endpoints.
///
/// `/match-history/all` is registered as its own literal segment so it never
/// collides with the per-court route.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/match-history", post(record_match))
        .route("/match-history/all", get(list_all))
        .route("/match-history/{courtId}", get(list_for_court))
}

#[utoipa::path(
    post,
    path = "/match-history",
    tag = "match-history",
    request_body = MatchResultRequest,
    responses(
        (status = 200, description = "Match recorded", body = MatchRecordResponse),
        (status = 400, description = "Invalid payload or unknown court")
    )
)]
/// Record a completed match pushed by a scorer.
pub async fn record_match(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<MatchResultRequest>>,
) -> Result<Json<MatchRecordResponse>, AppError> {
    Ok(Json(
        match_history_service::record_match(&state, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/match-history/all",
    tag = "match-history",
    params(HistoryQuery),
    responses((status = 200, description = "Recent matches across all courts", body = [MatchRecordResponse]))
)]
/// List recent matches across all courts, newest first.
pub async fn list_all(
    State(state): State<SharedState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MatchRecordResponse>>, AppError> {
    Ok(Json(match_history_service::list_all(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/match-history/{courtId}",
    tag = "match-history",
    params(
        ("courtId" = u16, Path, description = "Public court number"),
        HistoryQuery
    ),
    responses((status = 200, description = "Recent matches on one court", body = [MatchRecordResponse]))
)]
/// List recent matches on a single court, newest first.
pub async fn list_for_court(
    State(state): State<SharedState>,
    Path(court_id): Path<u16>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MatchRecordResponse>>, AppError> {
    Ok(Json(
        match_history_service::list_for_court(&state, court_id, query).await?,
    ))
}
