use axum::{Json, Router, extract::State, routing::post};
use axum_valid::Valid;

use crate::{
    dto::scores::{SubmitScoreRequest, SubmitScoreResponse},
    error::AppError,
    services::score_service,
    state::SharedState,
};

/// Routes handling score submissions.
pub fn router() -> Router<SharedState> {
    Router::new().route("/scores", post(submit_score))
}

/// Record the result of one finished game.
#[utoipa::path(
    post,
    path = "/scores",
    tag = "scores",
    request_body = SubmitScoreRequest,
    responses(
        (status = 200, description = "Score recorded", body = SubmitScoreResponse),
        (status = 400, description = "Invalid submission"),
        (status = 503, description = "Storage unavailable"),
    )
)]
pub async fn submit_score(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<SubmitScoreRequest>>,
) -> Result<Json<SubmitScoreResponse>, AppError> {
    let response = score_service::submit_score(&state, payload).await?;
    Ok(Json(response))
}
