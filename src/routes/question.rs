use axum::{Json, Router, routing::get};

use crate::{dto::question::QuestionResponse, services::question_service, state::SharedState};

/// Routes serving practice questions.
pub fn router() -> Router<SharedState> {
    Router::new().route("/question", get(question))
}

/// Generate one random addition question.
#[utoipa::path(
    get,
    path = "/question",
    tag = "question",
    responses((status = 200, description = "Generated question", body = QuestionResponse))
)]
pub async fn question() -> Json<QuestionResponse> {
    Json(question_service::generate_question())
}
