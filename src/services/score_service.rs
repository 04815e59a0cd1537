use std::time::SystemTime;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dao::models::ScoreEntity,
    dto::scores::{SubmitScoreRequest, SubmitScoreResponse},
    error::ServiceError,
    services::{leaderboard_service, notification_service, stats_service},
    state::SharedState,
};

/// Record one finished game.
///
/// The score write is the only step whose failure fails the request. The
/// aggregate update, the board-membership check, and the congratulation mail
/// are each attempted once and logged when they go wrong; none of them is
/// retried and none of them turns a durable score into an error response.
pub async fn submit_score(
    state: &SharedState,
    request: SubmitScoreRequest,
) -> Result<SubmitScoreResponse, ServiceError> {
    let (username, score) = validate(&request)?;

    let store = state.require_score_store().await?;

    let entity = ScoreEntity {
        score_id: Uuid::new_v4(),
        username: username.clone(),
        score,
        game_level: request.level,
        submitted_at: SystemTime::now(),
    };
    let score_id = entity.score_id;
    store.insert_score(entity).await?;

    if let Err(err) = stats_service::record_game(store.as_ref(), &username, score).await {
        warn!(
            user = %username,
            error = %err,
            "aggregate update failed; score already recorded, reporting success"
        );
    }

    let board_size = state.config().leaderboard_size();
    let on_board =
        match leaderboard_service::is_in_top_n(store.as_ref(), score_id, request.level, board_size)
            .await
        {
            Ok(on_board) => on_board,
            Err(err) => {
                warn!(error = %err, "board-membership check failed; skipping notification");
                false
            }
        };

    if on_board {
        match &request.email {
            Some(email) => {
                notification_service::notify_high_score(
                    state,
                    email,
                    &username,
                    score,
                    request.level,
                )
                .await;
            }
            None => debug!(user = %username, "score made the board but no address was supplied"),
        }
    }

    Ok(SubmitScoreResponse {
        score_id,
        message: "Score submitted successfully".to_owned(),
    })
}

/// Domain validation ahead of any storage call.
fn validate(request: &SubmitScoreRequest) -> Result<(String, u32), ServiceError> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(ServiceError::InvalidInput(
            "username must not be blank".to_owned(),
        ));
    }

    let score = u32::try_from(request.score)
        .map_err(|_| ServiceError::InvalidInput("score must be non-negative".to_owned()))?;

    Ok((username.to_owned(), score))
}
