use tracing::{debug, warn};

use crate::dao::{models::HighScoreOutcome, score_store::ScoreStore, storage::StorageError};

/// What happened to the highest-score step of one aggregate update.
///
/// The step is distinct from the games-played increment: the tally may
/// already be bumped when the highest-score write fails, and a guard that
/// does not match is a normal outcome rather than a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighScoreStep {
    /// A new personal best was written.
    Raised,
    /// The stored best was already at least as large; nothing was written.
    NotHigher,
    /// Storage failed after the tally was incremented. Logged here, never
    /// surfaced to the submission path.
    Failed,
}

/// Fold one finished game into the player's aggregate row.
///
/// Two independent storage writes, not a transaction: the games-played tally
/// is incremented unconditionally, then the highest score is raised behind
/// the store's compare-and-set guard. A failed increment aborts the whole
/// update; a failed raise only loses the personal-best bump, the tally
/// stays counted.
pub async fn record_game(
    store: &dyn ScoreStore,
    username: &str,
    score: u32,
) -> Result<HighScoreStep, StorageError> {
    store.increment_games_played(username).await?;

    match store.raise_highest_score(username, score).await {
        Ok(HighScoreOutcome::Raised) => {
            debug!(user = %username, score, "new personal best recorded");
            Ok(HighScoreStep::Raised)
        }
        Ok(HighScoreOutcome::NotHigher) => Ok(HighScoreStep::NotHigher),
        Err(err) => {
            warn!(
                user = %username,
                error = %err,
                "highest-score update failed; games-played tally already counted"
            );
            Ok(HighScoreStep::Failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};

    use futures::future::BoxFuture;

    use super::*;
    use crate::dao::{
        models::{GameLevel, PlayerEntity, ScoreEntity},
        score_store::memory::MemoryScoreStore,
        storage::StorageResult,
    };

    #[tokio::test]
    async fn tally_and_best_track_repeated_games() {
        let store = MemoryScoreStore::new();
        for score in [10, 50, 30] {
            record_game(&store, "ada", score).await.unwrap();
        }

        let row = ScoreStore::find_player(&store, "ada")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.total_games_played, 3);
        assert_eq!(row.highest_score, 50);
    }

    #[tokio::test]
    async fn lower_score_skips_the_raise() {
        let store = MemoryScoreStore::new();
        assert_eq!(
            record_game(&store, "ada", 90).await.unwrap(),
            HighScoreStep::Raised
        );
        assert_eq!(
            record_game(&store, "ada", 40).await.unwrap(),
            HighScoreStep::NotHigher
        );
    }

    /// Store that delegates to memory but fails the configured steps.
    struct FaultyStore {
        inner: MemoryScoreStore,
        fail_increment: AtomicBool,
        fail_raise: AtomicBool,
    }

    impl FaultyStore {
        fn new() -> Self {
            Self {
                inner: MemoryScoreStore::new(),
                fail_increment: AtomicBool::new(false),
                fail_raise: AtomicBool::new(false),
            }
        }

        fn injected() -> StorageError {
            StorageError::unavailable("injected fault".to_owned(), io::Error::other("injected"))
        }
    }

    impl ScoreStore for FaultyStore {
        fn insert_score(&self, score: ScoreEntity) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.insert_score(score)
        }

        fn scan_scores(
            &self,
            level: Option<GameLevel>,
        ) -> BoxFuture<'static, StorageResult<Vec<ScoreEntity>>> {
            self.inner.scan_scores(level)
        }

        fn create_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<bool>> {
            self.inner.create_player(player)
        }

        fn find_player(
            &self,
            username: &str,
        ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
            self.inner.find_player(username)
        }

        fn increment_games_played(&self, username: &str) -> BoxFuture<'static, StorageResult<()>> {
            if self.fail_increment.load(Ordering::SeqCst) {
                return Box::pin(async { Err(Self::injected()) });
            }
            self.inner.increment_games_played(username)
        }

        fn raise_highest_score(
            &self,
            username: &str,
            score: u32,
        ) -> BoxFuture<'static, StorageResult<crate::dao::models::HighScoreOutcome>> {
            if self.fail_raise.load(Ordering::SeqCst) {
                return Box::pin(async { Err(Self::injected()) });
            }
            self.inner.raise_highest_score(username, score)
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.health_check()
        }

        fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.try_reconnect()
        }
    }

    #[tokio::test]
    async fn failed_increment_aborts_the_update() {
        let store = FaultyStore::new();
        store.fail_increment.store(true, Ordering::SeqCst);

        assert!(record_game(&store, "ada", 70).await.is_err());
        assert!(
            ScoreStore::find_player(&store.inner, "ada")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn failed_raise_keeps_the_tally_and_is_swallowed() {
        let store = FaultyStore::new();
        store.fail_raise.store(true, Ordering::SeqCst);

        assert_eq!(
            record_game(&store, "ada", 70).await.unwrap(),
            HighScoreStep::Failed
        );

        let row = ScoreStore::find_player(&store.inner, "ada")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.total_games_played, 1);
        assert_eq!(row.highest_score, 0);
    }
}
