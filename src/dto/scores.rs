use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{dao::models::GameLevel, dto::validation::validate_username};

/// Payload submitting the result of one finished game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubmitScoreRequest {
    #[validate(custom(function = validate_username))]
    pub username: String,
    /// Points achieved. Negative submissions are rejected.
    #[validate(range(min = 0, max = 4_294_967_295_i64))]
    #[schema(value_type = i64, minimum = 0)]
    pub score: i64,
    /// Difficulty the game was played at. Optional for legacy clients that
    /// never send one.
    #[serde(default)]
    pub level: Option<GameLevel>,
    /// Address to congratulate when the score makes the board.
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
}

/// Acknowledgement returned once a submission has been recorded.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitScoreResponse {
    /// Identifier assigned to the stored score record.
    pub score_id: Uuid,
    pub message: String,
}
