use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{GameLevel, PlayerEntity, ScoreEntity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoScoreDocument {
    #[serde(rename = "_id")]
    score_id: Uuid,
    username: String,
    score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    game_level: Option<GameLevel>,
    submitted_at: DateTime,
}

impl From<ScoreEntity> for MongoScoreDocument {
    fn from(value: ScoreEntity) -> Self {
        Self {
            score_id: value.score_id,
            username: value.username,
            score: value.score,
            game_level: value.game_level,
            submitted_at: DateTime::from_system_time(value.submitted_at),
        }
    }
}

impl From<MongoScoreDocument> for ScoreEntity {
    fn from(value: MongoScoreDocument) -> Self {
        Self {
            score_id: value.score_id,
            username: value.username,
            score: value.score,
            game_level: value.game_level,
            submitted_at: value.submitted_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPlayerDocument {
    #[serde(rename = "_id")]
    username: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    total_games_played: u64,
    #[serde(default)]
    highest_score: u32,
}

impl From<PlayerEntity> for MongoPlayerDocument {
    fn from(value: PlayerEntity) -> Self {
        Self {
            username: value.username,
            email: value.email,
            total_games_played: value.total_games_played,
            highest_score: value.highest_score,
        }
    }
}

impl From<MongoPlayerDocument> for PlayerEntity {
    fn from(value: MongoPlayerDocument) -> Self {
        Self {
            username: value.username,
            email: value.email,
            total_games_played: value.total_games_played,
            highest_score: value.highest_score,
        }
    }
}
