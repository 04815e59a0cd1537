use std::sync::Arc;

use dashmap::{DashMap, Entry};
use futures::future::BoxFuture;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dao::{
    models::{GameLevel, HighScoreOutcome, PlayerEntity, ScoreEntity},
    score_store::ScoreStore,
    storage::StorageResult,
};

/// In-memory score store backing tests and the no-database dev mode.
///
/// The score table is insertion-ordered, so a scan returns records in
/// submission order — the storage order the leaderboard's stable sort ties
/// back to. Player rows only ever see per-key mutation and live in a
/// concurrent map keyed by username.
#[derive(Clone, Default)]
pub struct MemoryScoreStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    scores: RwLock<IndexMap<Uuid, ScoreEntity>>,
    players: DashMap<String, PlayerEntity>,
}

impl MemoryScoreStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    async fn insert_score(&self, score: ScoreEntity) {
        let mut scores = self.inner.scores.write().await;
        scores.insert(score.score_id, score);
    }

    async fn scan_scores(&self, level: Option<GameLevel>) -> Vec<ScoreEntity> {
        let scores = self.inner.scores.read().await;
        scores
            .values()
            .filter(|record| match level {
                Some(wanted) => record.game_level == Some(wanted),
                None => true,
            })
            .cloned()
            .collect()
    }

    fn create_player(&self, player: PlayerEntity) -> bool {
        match self.inner.players.entry(player.username.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(player);
                true
            }
        }
    }

    fn find_player(&self, username: &str) -> Option<PlayerEntity> {
        self.inner
            .players
            .get(username)
            .map(|row| row.value().clone())
    }

    fn increment_games_played(&self, username: String) {
        let mut row = self
            .inner
            .players
            .entry(username.clone())
            .or_insert_with(|| PlayerEntity::new(username, None));
        row.total_games_played += 1;
    }

    fn raise_highest_score(&self, username: String, score: u32) -> HighScoreOutcome {
        match self.inner.players.entry(username.clone()) {
            Entry::Occupied(mut entry) => {
                if score > entry.get().highest_score {
                    entry.get_mut().highest_score = score;
                    HighScoreOutcome::Raised
                } else {
                    HighScoreOutcome::NotHigher
                }
            }
            // A player without a recorded best always takes the new score.
            Entry::Vacant(entry) => {
                let mut row = PlayerEntity::new(username, None);
                row.highest_score = score;
                entry.insert(row);
                HighScoreOutcome::Raised
            }
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn insert_score(&self, score: ScoreEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.insert_score(score).await;
            Ok(())
        })
    }

    fn scan_scores(
        &self,
        level: Option<GameLevel>,
    ) -> BoxFuture<'static, StorageResult<Vec<ScoreEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.scan_scores(level).await) })
    }

    fn create_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.create_player(player)) })
    }

    fn find_player(
        &self,
        username: &str,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        let username = username.to_owned();
        Box::pin(async move { Ok(store.find_player(&username)) })
    }

    fn increment_games_played(&self, username: &str) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        let username = username.to_owned();
        Box::pin(async move {
            store.increment_games_played(username);
            Ok(())
        })
    }

    fn raise_highest_score(
        &self,
        username: &str,
        score: u32,
    ) -> BoxFuture<'static, StorageResult<HighScoreOutcome>> {
        let store = self.clone();
        let username = username.to_owned();
        Box::pin(async move { Ok(store.raise_highest_score(username, score)) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
