//! Recording and listing of completed matches.

use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    dao::models::MatchRecordEntity,
    dto::match_history::{HistoryQuery, MatchRecordResponse, MatchResultRequest},
    error::ServiceError,
    state::SharedState,
};

const DEFAULT_ALL_LIMIT: usize = 30;
const DEFAULT_COURT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

/// Persist a completed match pushed by a scorer.
pub async fn record_match(
    state: &SharedState,
    request: MatchResultRequest,
) -> Result<MatchRecordResponse, ServiceError> {
    let store = state.require_court_store().await?;
    if store.find_court(request.court_id).await?.is_none() {
        return Err(ServiceError::InvalidInput(format!(
            "court {} not found",
            request.court_id
        )));
    }

    let record = MatchRecordEntity {
        id: Uuid::new_v4(),
        court_number: request.court_id,
        winner_name: request.winner_name,
        loser_name: request.loser_name,
        games_won: request.games_won,
        duration: request.duration,
        set_scores: request.set_scores,
        match_date: OffsetDateTime::now_utc(),
    };

    store.record_match(record.clone()).await?;
    Ok(record.into())
}

/// Most recent matches across all courts, newest first.
pub async fn list_all(
    state: &SharedState,
    query: HistoryQuery,
) -> Result<Vec<MatchRecordResponse>, ServiceError> {
    let store = state.require_court_store().await?;
    let limit = query.limit.unwrap_or(DEFAULT_ALL_LIMIT).min(MAX_LIMIT);
    let offset = query.offset.unwrap_or(0);

    let records = store.list_match_records(None, limit, offset).await?;
    Ok(records.into_iter().map(Into::into).collect())
}

/// Most recent matches on one court, newest first.
pub async fn list_for_court(
    state: &SharedState,
    court_number: u16,
    query: HistoryQuery,
) -> Result<Vec<MatchRecordResponse>, ServiceError> {
    let store = state.require_court_store().await?;
    let limit = query.limit.unwrap_or(DEFAULT_COURT_LIMIT).min(MAX_LIMIT);
    let offset = query.offset.unwrap_or(0);

    let records = store
        .list_match_records(Some(court_number), limit, offset)
        .await?;
    Ok(records.into_iter().map(Into::into).collect())
}
