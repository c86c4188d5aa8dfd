use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Client, Collection, Database, bson::doc, options::IndexOptions};
use tokio::sync::RwLock;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{CourtDocument, GameStateDocument, MatchRecordDocument},
};
use crate::dao::{
    court_store::CourtStore,
    models::{CourtEntity, CourtUpdateEntity, GameStateEntity, MatchRecordEntity},
    storage::StorageResult,
};

const COURT_COLLECTION: &str = "courts";
const STATE_COLLECTION: &str = "game_states";
const HISTORY_COLLECTION: &str = "match_history";

/// MongoDB-backed court store.
#[derive(Clone)]
pub struct MongoCourtStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoCourtStore {
    /// Connect, ensure indexes, and provision at least `default_court_count`
    /// court records.
    pub async fn connect(config: MongoConfig, default_court_count: u16) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        store.ensure_courts(default_court_count).await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;
        let collection = database.collection::<MatchRecordDocument>(HISTORY_COLLECTION);
        let index = mongodb::IndexModel::builder()
            .keys(doc! {"court_number": 1, "match_date": -1})
            .options(
                IndexOptions::builder()
                    .name(Some("match_court_date_idx".to_owned()))
                    .build(),
            )
            .build();

        collection
            .create_index(index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: HISTORY_COLLECTION,
                index: "court_number,match_date",
                source,
            })?;

        Ok(())
    }

    /// Insert any missing court records up to `count` without touching
    /// existing ones.
    async fn ensure_courts(&self, count: u16) -> MongoResult<()> {
        let collection = self.court_collection().await;
        for number in 1..=count {
            let existing = collection
                .find_one(doc! {"_id": number as i32})
                .await
                .map_err(|source| MongoDaoError::LoadCourts { source })?;
            if existing.is_none() {
                let document: CourtDocument = CourtEntity::new(number).into();
                collection
                    .insert_one(&document)
                    .await
                    .map_err(|source| MongoDaoError::SaveCourt { number, source })?;
            }
        }
        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn court_collection(&self) -> Collection<CourtDocument> {
        self.database().await.collection(COURT_COLLECTION)
    }

    async fn state_collection(&self) -> Collection<GameStateDocument> {
        self.database().await.collection(STATE_COLLECTION)
    }

    async fn history_collection(&self) -> Collection<MatchRecordDocument> {
        self.database().await.collection(HISTORY_COLLECTION)
    }

    async fn court_count(&self) -> MongoResult<u16> {
        let collection = self.court_collection().await;
        let count = collection
            .count_documents(doc! {})
            .await
            .map_err(|source| MongoDaoError::LoadCourts { source })?;
        Ok(count as u16)
    }

    async fn set_court_count(&self, count: u16) -> MongoResult<()> {
        self.ensure_courts(count).await?;

        let collection = self.court_collection().await;
        collection
            .delete_many(doc! {"_id": {"$gt": count as i32}})
            .await
            .map_err(|source| MongoDaoError::SaveCourt {
                number: count,
                source,
            })?;

        let states = self.state_collection().await;
        states
            .delete_many(doc! {"_id": {"$gt": count as i32}})
            .await
            .map_err(|source| MongoDaoError::DeleteState {
                number: count,
                source,
            })?;
        Ok(())
    }

    async fn list_courts(&self) -> MongoResult<Vec<CourtEntity>> {
        let collection = self.court_collection().await;
        let documents: Vec<CourtDocument> = collection
            .find(doc! {})
            .sort(doc! {"_id": 1})
            .await
            .map_err(|source| MongoDaoError::LoadCourts { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadCourts { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn find_court(&self, number: u16) -> MongoResult<Option<CourtEntity>> {
        let collection = self.court_collection().await;
        let document = collection
            .find_one(doc! {"_id": number as i32})
            .await
            .map_err(|source| MongoDaoError::LoadCourts { source })?;
        Ok(document.map(Into::into))
    }

    async fn update_court(
        &self,
        number: u16,
        update: CourtUpdateEntity,
    ) -> MongoResult<Option<CourtEntity>> {
        let Some(mut court) = self.find_court(number).await? else {
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

        let document: CourtDocument = court.clone().into();
        let collection = self.court_collection().await;
        collection
            .replace_one(doc! {"_id": document.number}, &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveCourt { number, source })?;

        Ok(Some(court))
    }

    async fn find_game_state(&self, number: u16) -> MongoResult<Option<GameStateEntity>> {
        let collection = self.state_collection().await;
        let document = collection
            .find_one(doc! {"_id": number as i32})
            .await
            .map_err(|source| MongoDaoError::LoadState { number, source })?;
        Ok(document.map(|doc| doc.state))
    }

    async fn save_game_state(&self, number: u16, state: GameStateEntity) -> MongoResult<()> {
        let document = GameStateDocument {
            court_number: number as i32,
            state,
        };
        let collection = self.state_collection().await;
        collection
            .replace_one(doc! {"_id": document.court_number}, &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveState { number, source })?;
        Ok(())
    }

    async fn delete_game_state(&self, number: u16) -> MongoResult<bool> {
        let collection = self.state_collection().await;
        let result = collection
            .delete_one(doc! {"_id": number as i32})
            .await
            .map_err(|source| MongoDaoError::DeleteState { number, source })?;
        Ok(result.deleted_count > 0)
    }

    async fn record_match(&self, record: MatchRecordEntity) -> MongoResult<()> {
        let number = record.court_number;
        let document: MatchRecordDocument = record.into();
        let collection = self.history_collection().await;
        collection
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::RecordMatch { number, source })?;
        Ok(())
    }

    async fn list_match_records(
        &self,
        court: Option<u16>,
        limit: usize,
        offset: usize,
    ) -> MongoResult<Vec<MatchRecordEntity>> {
        let filter = match court {
            Some(number) => doc! {"court_number": number as i32},
            None => doc! {},
        };

        let collection = self.history_collection().await;
        let documents: Vec<MatchRecordDocument> = collection
            .find(filter)
            .sort(doc! {"match_date": -1})
            .skip(offset as u64)
            .limit(limit as i64)
            .await
            .map_err(|source| MongoDaoError::ListMatches { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListMatches { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }
}

impl CourtStore for MongoCourtStore {
    fn court_count(&self) -> BoxFuture<'static, StorageResult<u16>> {
        let store = self.clone();
        Box::pin(async move { store.court_count().await.map_err(Into::into) })
    }

    fn set_court_count(&self, count: u16) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.set_court_count(count).await.map_err(Into::into) })
    }

    fn list_courts(&self) -> BoxFuture<'static, StorageResult<Vec<CourtEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_courts().await.map_err(Into::into) })
    }

    fn find_court(&self, number: u16) -> BoxFuture<'static, StorageResult<Option<CourtEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_court(number).await.map_err(Into::into) })
    }

    fn update_court(
        &self,
        number: u16,
        update: CourtUpdateEntity,
    ) -> BoxFuture<'static, StorageResult<Option<CourtEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.update_court(number, update).await.map_err(Into::into) })
    }

    fn find_game_state(
        &self,
        number: u16,
    ) -> BoxFuture<'static, StorageResult<Option<GameStateEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game_state(number).await.map_err(Into::into) })
    }

    fn save_game_state(
        &self,
        number: u16,
        state: GameStateEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .save_game_state(number, state)
                .await
                .map_err(Into::into)
        })
    }

    fn delete_game_state(&self, number: u16) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_game_state(number).await.map_err(Into::into) })
    }

    fn record_match(&self, record: MatchRecordEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.record_match(record).await.map_err(Into::into) })
    }

    fn list_match_records(
        &self,
        court: Option<u16>,
        limit: usize,
        offset: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<MatchRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_match_records(court, limit, offset)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
