use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use axum_valid::Valid;

use crate::{
    dto::{
        common::ActionResponse,
        game_state::{GameStateResponse, GameStateUpdate, SaveQuery},
    },
    error::AppError,
    services::game_state_service,
    state::SharedState,
};

/// Game state persistence endpoints used by scorers, displays and the admin
/// panel.
pub fn router() -> Router<SharedState> {
    Router::new().route(
        "/game-states/{courtId}",
        get(get_game_state)
            .put(put_game_state)
            .delete(delete_game_state),
    )
}

#[utoipa::path(
    get,
    path = "/game-states/{courtId}",
    tag = "game-states",
    params(("courtId" = u16, Path, description = "Public court number")),
    responses(
        (status = 200, description = "Current game state for the court", body = GameStateResponse),
        (status = 404, description = "Unknown court")
    )
)]
/// Return the stored game state for a court, merged with the court record,
/// or placeholder defaults when nothing is stored yet.
pub async fn get_game_state(
    State(state): State<SharedState>,
    Path(court_id): Path<u16>,
) -> Result<Json<GameStateResponse>, AppError> {
    Ok(Json(
        game_state_service::get_game_state(&state, court_id).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/game-states/{courtId}",
    tag = "game-states",
    params(
        ("courtId" = u16, Path, description = "Public court number"),
        SaveQuery
    ),
    request_body = GameStateUpdate,
    responses(
        (status = 200, description = "State upserted", body = ActionResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Unknown court")
    )
)]
/// Upsert the game state for a court. Carries the automatic mark-active
/// derivation unless `skipAutoActive=true`.
pub async fn put_game_state(
    State(state): State<SharedState>,
    Path(court_id): Path<u16>,
    Query(query): Query<SaveQuery>,
    Valid(Json(payload)): Valid<Json<GameStateUpdate>>,
) -> Result<Json<ActionResponse>, AppError> {
    game_state_service::upsert_game_state(&state, court_id, payload, query.skip_auto_active)
        .await?;
    Ok(Json(ActionResponse::ok()))
}

#[utoipa::path(
    delete,
    path = "/game-states/{courtId}",
    tag = "game-states",
    params(("courtId" = u16, Path, description = "Public court number")),
    responses(
        (status = 200, description = "State cleared and court deactivated", body = ActionResponse),
        (status = 404, description = "Unknown court")
    )
)]
/// Administrator reset: delete the stored state and mark the court inactive.
pub async fn delete_game_state(
    State(state): State<SharedState>,
    Path(court_id): Path<u16>,
) -> Result<Json<ActionResponse>, AppError> {
    game_state_service::delete_game_state(&state, court_id).await?;
    Ok(Json(ActionResponse::ok()))
}
