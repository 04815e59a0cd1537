pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;

use crate::dao::models::{GameLevel, HighScoreOutcome, PlayerEntity, ScoreEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for score records and player rows.
///
/// The methods mirror the primitives the backends offer natively: append-only
/// inserts, filtered scans, put-if-new, an atomic counter increment, and a
/// guarded (compare-and-set) write. Consistency of concurrent submissions is
/// delegated to those primitives; no locking happens above this trait.
pub trait ScoreStore: Send + Sync {
    /// Persist one immutable score record.
    fn insert_score(&self, score: ScoreEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Read all score records, optionally restricted to one difficulty
    /// partition. Partitioned scans exclude records that carry no level.
    fn scan_scores(
        &self,
        level: Option<GameLevel>,
    ) -> BoxFuture<'static, StorageResult<Vec<ScoreEntity>>>;
    /// Create a player row unless one already exists. Returns whether a row
    /// was created; an existing row is left untouched.
    fn create_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<bool>>;
    /// Fetch a player row by username.
    fn find_player(
        &self,
        username: &str,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    /// Atomically add one game to a player's tally, initializing the row with
    /// zeroed counters when it does not exist yet.
    fn increment_games_played(&self, username: &str) -> BoxFuture<'static, StorageResult<()>>;
    /// Raise the stored highest score to `score` if it is strictly greater
    /// than the current value. The guard not matching is reported as
    /// [`HighScoreOutcome::NotHigher`], not as an error.
    fn raise_highest_score(
        &self,
        username: &str,
        score: u32,
    ) -> BoxFuture<'static, StorageResult<HighScoreOutcome>>;
    /// Cheap connectivity probe used by the health endpoint and supervisor.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the backend connection after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
