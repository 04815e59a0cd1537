use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database,
    bson::{Bson, doc},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::IndexOptions,
};
use tokio::sync::RwLock;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoPlayerDocument, MongoScoreDocument},
};
use crate::dao::{
    models::{GameLevel, HighScoreOutcome, PlayerEntity, ScoreEntity},
    score_store::ScoreStore,
    storage::StorageResult,
};

const SCORE_COLLECTION_NAME: &str = "scores";
const PLAYER_COLLECTION_NAME: &str = "players";

#[derive(Clone)]
pub struct MongoScoreStore {
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

impl MongoScoreStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        // Leaderboard scans filter on the submitted difficulty.
        let collection = database.collection::<mongodb::bson::Document>(SCORE_COLLECTION_NAME);
        let index = mongodb::IndexModel::builder()
            .keys(doc! {"game_level": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("score_level_idx".to_owned()))
                    .build(),
            )
            .build();

        collection
            .create_index(index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: SCORE_COLLECTION_NAME,
                index: "game_level",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn score_collection(&self) -> Collection<MongoScoreDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoScoreDocument>(SCORE_COLLECTION_NAME)
    }

    async fn player_collection(&self) -> Collection<MongoPlayerDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoPlayerDocument>(PLAYER_COLLECTION_NAME)
    }

    async fn insert_score(&self, score: ScoreEntity) -> MongoResult<()> {
        let id = score.score_id;
        let document: MongoScoreDocument = score.into();
        let collection = self.score_collection().await;

        collection
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveScore { id, source })?;

        Ok(())
    }

    async fn scan_scores(&self, level: Option<GameLevel>) -> MongoResult<Vec<ScoreEntity>> {
        let filter = match level {
            Some(level) => doc! {"game_level": level.to_string()},
            None => doc! {},
        };
        let collection = self.score_collection().await;

        let documents: Vec<MongoScoreDocument> = collection
            .find(filter)
            .await
            .map_err(|source| MongoDaoError::ScanScores { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ScanScores { source })?;

        Ok(documents.into_iter().map(ScoreEntity::from).collect())
    }

    async fn create_player(&self, player: PlayerEntity) -> MongoResult<bool> {
        let username = player.username.clone();
        let document: MongoPlayerDocument = player.into();
        let collection = self.player_collection().await;

        match collection.insert_one(&document).await {
            Ok(_) => Ok(true),
            Err(err) if is_duplicate_key(&err) => Ok(false),
            Err(source) => Err(MongoDaoError::CreatePlayer { username, source }),
        }
    }

    async fn find_player(&self, username: String) -> MongoResult<Option<PlayerEntity>> {
        let collection = self.player_collection().await;

        let document = collection
            .find_one(doc! {"_id": username.as_str()})
            .await
            .map_err(|source| MongoDaoError::LoadPlayer { username, source })?;

        Ok(document.map(PlayerEntity::from))
    }

    async fn increment_games_played(&self, username: String) -> MongoResult<()> {
        let collection = self.player_collection().await;
        let update = doc! {
            "$inc": {"total_games_played": 1_i64},
            "$setOnInsert": {"email": Bson::Null, "highest_score": 0_i64},
        };

        let result = collection
            .update_one(doc! {"_id": username.as_str()}, update.clone())
            .upsert(true)
            .await;

        match result {
            Ok(_) => Ok(()),
            // Two first submissions for the same player can race the upsert
            // insert; the loser sees a duplicate key. The row exists at that
            // point, so one plain re-issue of the increment lands it.
            Err(err) if is_duplicate_key(&err) => {
                collection
                    .update_one(doc! {"_id": username.as_str()}, update)
                    .await
                    .map_err(|source| MongoDaoError::UpdatePlayer { username, source })?;
                Ok(())
            }
            Err(source) => Err(MongoDaoError::UpdatePlayer { username, source }),
        }
    }

    async fn raise_highest_score(
        &self,
        username: String,
        score: u32,
    ) -> MongoResult<HighScoreOutcome> {
        let collection = self.player_collection().await;

        // The filter only matches when the stored best is absent or lower.
        // With upsert enabled, a guarded update against an existing row that
        // fails the condition surfaces as a duplicate-key insert attempt.
        let result = collection
            .update_one(
                doc! {
                    "_id": username.as_str(),
                    "$or": [
                        {"highest_score": {"$exists": false}},
                        {"highest_score": {"$lt": i64::from(score)}},
                    ],
                },
                doc! {
                    "$set": {"highest_score": i64::from(score)},
                    "$setOnInsert": {"email": Bson::Null, "total_games_played": 0_i64},
                },
            )
            .upsert(true)
            .await;

        match result {
            Ok(outcome) if outcome.matched_count > 0 || outcome.upserted_id.is_some() => {
                Ok(HighScoreOutcome::Raised)
            }
            Ok(_) => Ok(HighScoreOutcome::NotHigher),
            Err(err) if is_duplicate_key(&err) => Ok(HighScoreOutcome::NotHigher),
            Err(source) => Err(MongoDaoError::UpdatePlayer { username, source }),
        }
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_err)) if write_err.code == 11000
    )
}

impl ScoreStore for MongoScoreStore {
    fn insert_score(&self, score: ScoreEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_score(score).await.map_err(Into::into) })
    }

    fn scan_scores(
        &self,
        level: Option<GameLevel>,
    ) -> BoxFuture<'static, StorageResult<Vec<ScoreEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.scan_scores(level).await.map_err(Into::into) })
    }

    fn create_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.create_player(player).await.map_err(Into::into) })
    }

    fn find_player(&self, username: &str) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        let username = username.to_owned();
        Box::pin(async move { store.find_player(username).await.map_err(Into::into) })
    }

    fn increment_games_played(&self, username: &str) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        let username = username.to_owned();
        Box::pin(async move {
            store
                .increment_games_played(username)
                .await
                .map_err(Into::into)
        })
    }

    fn raise_highest_score(
        &self,
        username: &str,
        score: u32,
    ) -> BoxFuture<'static, StorageResult<HighScoreOutcome>> {
        let store = self.clone();
        let username = username.to_owned();
        Box::pin(async move {
            store
                .raise_highest_score(username, score)
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
