use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Difficulty tier a round was played at.
///
/// Serialized lowercase on the wire and in storage so leaderboard partitions
/// match the values submitted by clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GameLevel {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for GameLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GameLevel::Easy => "easy",
            GameLevel::Medium => "medium",
            GameLevel::Hard => "hard",
        };
        f.write_str(label)
    }
}

/// One score submission as persisted by the score store.
///
/// Records are append-only: written once with a freshly generated id and a
/// server-assigned timestamp, never mutated or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreEntity {
    /// Generated primary key of the submission.
    pub score_id: Uuid,
    /// Player the score belongs to.
    pub username: String,
    /// Points scored in the round.
    pub score: u32,
    /// Difficulty the round was played at; legacy submissions carry none.
    pub game_level: Option<GameLevel>,
    /// Server-assigned instant of the write.
    pub submitted_at: SystemTime,
}

/// Per-player running statistics row.
///
/// Created lazily (all counters zero) the first time a player shows up,
/// either through registration or through their first score submission.
/// `total_games_played` and `highest_score` only ever grow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Key of the row; player identities are usernames.
    pub username: String,
    /// Contact address captured at registration, if any.
    pub email: Option<String>,
    /// Number of score submissions recorded for this player.
    pub total_games_played: u64,
    /// Highest score the player has ever submitted.
    pub highest_score: u32,
}

impl PlayerEntity {
    /// Fresh row for a player with no recorded games.
    pub fn new(username: String, email: Option<String>) -> Self {
        Self {
            username,
            email,
            total_games_played: 0,
            highest_score: 0,
        }
    }
}

/// Result of the guarded highest-score write.
///
/// The guard failing is an ordinary outcome of the compare-and-set, distinct
/// from the storage call itself failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighScoreOutcome {
    /// The submitted score beat (or initialized) the stored highest score.
    Raised,
    /// The stored highest score was already at least as large; nothing was
    /// written.
    NotHigher,
}
