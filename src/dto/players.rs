use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{dao::models::PlayerEntity, dto::validation::validate_username};

/// Payload registering a player before their first game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterPlayerRequest {
    #[validate(custom(function = validate_username))]
    pub username: String,
    /// Address used for high-score congratulation mail.
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
}

/// Outcome of a registration attempt.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterPlayerResponse {
    pub username: String,
    /// `false` when the player already existed; the stored row is untouched.
    pub created: bool,
}

/// Aggregate counters kept per player.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerStatsResponse {
    pub username: String,
    pub total_games_played: u64,
    pub highest_score: u32,
}

impl From<PlayerEntity> for PlayerStatsResponse {
    fn from(entity: PlayerEntity) -> Self {
        Self {
            username: entity.username,
            total_games_played: entity.total_games_played,
            highest_score: entity.highest_score,
        }
    }
}
