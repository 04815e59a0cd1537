use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    dao::models::{GameLevel, ScoreEntity},
    dto::format_system_time,
};

/// Query parameters selecting the board partition and size.
#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
pub struct LeaderboardQuery {
    /// Difficulty partition; omit for the board over every submission.
    #[serde(default)]
    pub level: Option<GameLevel>,
    /// Number of rows to return (defaults to the configured board size).
    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    pub limit: Option<usize>,
}

/// One ranked row of the leaderboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardRow {
    pub username: String,
    pub score: u32,
    /// RFC 3339 submission time.
    pub timestamp: String,
}

impl From<ScoreEntity> for LeaderboardRow {
    fn from(entity: ScoreEntity) -> Self {
        Self {
            username: entity.username,
            score: entity.score,
            timestamp: format_system_time(entity.submitted_at),
        }
    }
}
