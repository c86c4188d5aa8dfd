//! Court administration: the activity, doubles and game-mode toggles that
//! the reconciliation pull on court clients picks up.

use crate::{
    dto::court::{CourtSummary, CourtUpdateRequest},
    error::ServiceError,
    state::SharedState,
};

/// All provisioned courts ordered by number.
pub async fn list_courts(state: &SharedState) -> Result<Vec<CourtSummary>, ServiceError> {
    let store = state.require_court_store().await?;
    let courts = store.list_courts().await?;
    Ok(courts.into_iter().map(Into::into).collect())
}

/// A single court by its public number.
pub async fn get_court(state: &SharedState, number: u16) -> Result<CourtSummary, ServiceError> {
    let store = state.require_court_store().await?;
    store
        .find_court(number)
        .await?
        .map(Into::into)
        .ok_or_else(|| ServiceError::NotFound(format!("court {number} not found")))
}

/// Apply a partial update to a court record.
pub async fn update_court(
    state: &SharedState,
    number: u16,
    request: CourtUpdateRequest,
) -> Result<CourtSummary, ServiceError> {
    let store = state.require_court_store().await?;
    store
        .update_court(number, request.into())
        .await?
        .map(Into::into)
        .ok_or_else(|| ServiceError::NotFound(format!("court {number} not found")))
}
