/// In-memory backend used for tests and storeless deployments.
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{
    CourtEntity, CourtUpdateEntity, GameStateEntity, MatchRecordEntity,
};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Abstraction over the persistence layer for courts, per-court game state
/// and the match history log.
pub trait CourtStore: Send + Sync {
    /// Number of provisioned courts.
    fn court_count(&self) -> BoxFuture<'static, StorageResult<u16>>;
    /// Provision or remove court records so exactly `count` courts exist.
    fn set_court_count(&self, count: u16) -> BoxFuture<'static, StorageResult<()>>;
    /// All court records ordered by court number.
    fn list_courts(&self) -> BoxFuture<'static, StorageResult<Vec<CourtEntity>>>;
    /// Look up a single court by its public number.
    fn find_court(&self, number: u16) -> BoxFuture<'static, StorageResult<Option<CourtEntity>>>;
    /// Apply a partial update to a court record, returning the new record,
    /// or `None` when the court does not exist.
    fn update_court(
        &self,
        number: u16,
        update: CourtUpdateEntity,
    ) -> BoxFuture<'static, StorageResult<Option<CourtEntity>>>;
    /// Stored game state for a court, if any.
    fn find_game_state(
        &self,
        number: u16,
    ) -> BoxFuture<'static, StorageResult<Option<GameStateEntity>>>;
    /// Upsert the game state for a court.
    fn save_game_state(
        &self,
        number: u16,
        state: GameStateEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Delete the stored game state for a court; `true` when one existed.
    fn delete_game_state(&self, number: u16) -> BoxFuture<'static, StorageResult<bool>>;
    /// Append a completed match to the history log.
    fn record_match(&self, record: MatchRecordEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Most recent matches, newest first, optionally restricted to one court.
    fn list_match_records(
        &self,
        court: Option<u16>,
        limit: usize,
        offset: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<MatchRecordEntity>>>;
    /// Cheap connectivity probe.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish a dropped connection.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
