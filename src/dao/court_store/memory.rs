//! In-memory [`CourtStore`] backend.
//!
//! Backs service and route tests, and keeps small deployments running
//! without a database. State is lost on restart.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use futures::future::BoxFuture;

use crate::dao::court_store::CourtStore;
use crate::dao::models::{CourtEntity, CourtUpdateEntity, GameStateEntity, MatchRecordEntity};
use crate::dao::storage::StorageResult;

/// DashMap-backed store keyed by court number.
#[derive(Debug, Clone, Default)]
pub struct MemoryCourtStore {
    inner: Arc<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    courts: DashMap<u16, CourtEntity>,
    states: DashMap<u16, GameStateEntity>,
    matches: Mutex<Vec<MatchRecordEntity>>,
}

impl MemoryCourtStore {
    /// Store pre-provisioned with `court_count` courts numbered from 1.
    pub fn new(court_count: u16) -> Self {
        let store = Self::default();
        store.provision(court_count);
        store
    }

    fn provision(&self, count: u16) {
        for number in 1..=count {
            self.inner
                .courts
                .entry(number)
                .or_insert_with(|| CourtEntity::new(number));
        }
        self.inner.courts.retain(|number, _| *number <= count);
        self.inner.states.retain(|number, _| *number <= count);
    }
}

impl CourtStore for MemoryCourtStore {
    fn court_count(&self) -> BoxFuture<'static, StorageResult<u16>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.courts.len() as u16) })
    }

    fn set_court_count(&self, count: u16) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.provision(count);
            Ok(())
        })
    }

    fn list_courts(&self) -> BoxFuture<'static, StorageResult<Vec<CourtEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut courts: Vec<CourtEntity> = store
                .inner
                .courts
                .iter()
                .map(|entry| entry.value().clone())
                .collect();
            courts.sort_by_key(|court| court.number);
            Ok(courts)
        })
    }

    fn find_court(&self, number: u16) -> BoxFuture<'static, StorageResult<Option<CourtEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.courts.get(&number).map(|entry| entry.clone())) })
    }

    fn update_court(
        &self,
        number: u16,
        update: CourtUpdateEntity,
    ) -> BoxFuture<'static, StorageResult<Option<CourtEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let Some(mut court) = store.inner.courts.get_mut(&number) else {
                return Ok(None);
            };
            if let Some(is_active) = update.is_active {
                court.is_active = is_active;
            }
            if let Some(is_doubles) = update.is_doubles {
                court.is_doubles = is_doubles;
            }
            if let Some(game_mode) = update.game_mode {
                court.game_mode = game_mode;
            }
            Ok(Some(court.clone()))
        })
    }

    fn find_game_state(
        &self,
        number: u16,
    ) -> BoxFuture<'static, StorageResult<Option<GameStateEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.states.get(&number).map(|entry| entry.clone())) })
    }

    fn save_game_state(
        &self,
        number: u16,
        state: GameStateEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.states.insert(number, state);
            Ok(())
        })
    }

    fn delete_game_state(&self, number: u16) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.states.remove(&number).is_some()) })
    }

    fn record_match(&self, record: MatchRecordEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .inner
                .matches
                .lock()
                .expect("match log poisoned")
                .push(record);
            Ok(())
        })
    }

    fn list_match_records(
        &self,
        court: Option<u16>,
        limit: usize,
        offset: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<MatchRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let matches = store.inner.matches.lock().expect("match log poisoned");
            let mut selected: Vec<MatchRecordEntity> = matches
                .iter()
                .filter(|record| court.is_none_or(|number| record.court_number == number))
                .cloned()
                .collect();
            selected.sort_by(|a, b| b.match_date.cmp(&a.match_date));
            Ok(selected.into_iter().skip(offset).take(limit).collect())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use uuid::Uuid;

    use super::*;
    use crate::dao::models::PlayerEntity;
    use crate::state::match_state::GameMode;

    fn player(name: &str) -> PlayerEntity {
        PlayerEntity {
            name: name.into(),
            partner: None,
            score: 0,
            games: 0,
        }
    }

    fn record(court: u16, minute: u8) -> MatchRecordEntity {
        MatchRecordEntity {
            id: Uuid::new_v4(),
            court_number: court,
            winner_name: "Anna".into(),
            loser_name: "Bo".into(),
            games_won: "2-0".into(),
            duration: "24:31".into(),
            set_scores: None,
            match_date: datetime!(2025-03-01 18:00 UTC) + time::Duration::minutes(minute as i64),
        }
    }

    #[tokio::test]
    async fn provisioning_adds_and_removes_courts() {
        let store = MemoryCourtStore::new(4);
        assert_eq!(store.court_count().await.unwrap(), 4);

        store.set_court_count(2).await.unwrap();
        let courts = store.list_courts().await.unwrap();
        assert_eq!(
            courts.iter().map(|c| c.number).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert!(store.find_court(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn court_update_is_partial() {
        let store = MemoryCourtStore::new(1);
        let updated = store
            .update_court(
                1,
                CourtUpdateEntity {
                    game_mode: Some(GameMode::Fifteen),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.game_mode, GameMode::Fifteen);
        assert!(!updated.is_active);

        assert!(
            store
                .update_court(9, CourtUpdateEntity::default())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn game_state_round_trips() {
        let store = MemoryCourtStore::new(2);
        assert!(store.find_game_state(1).await.unwrap().is_none());

        let state = GameStateEntity::placeholder(player("Anna"), player("Bo"));
        store.save_game_state(1, state.clone()).await.unwrap();
        assert_eq!(store.find_game_state(1).await.unwrap(), Some(state));

        assert!(store.delete_game_state(1).await.unwrap());
        assert!(!store.delete_game_state(1).await.unwrap());
    }

    #[tokio::test]
    async fn match_log_filters_and_paginates_newest_first() {
        let store = MemoryCourtStore::new(2);
        for minute in 0..5 {
            store.record_match(record(1, minute)).await.unwrap();
        }
        store.record_match(record(2, 30)).await.unwrap();

        let all = store.list_match_records(None, 10, 0).await.unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0].court_number, 2);

        let court1 = store.list_match_records(Some(1), 2, 1).await.unwrap();
        assert_eq!(court1.len(), 2);
        assert!(court1.iter().all(|r| r.court_number == 1));
        assert!(court1[0].match_date > court1[1].match_date);
    }
}
