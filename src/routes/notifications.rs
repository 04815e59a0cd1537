use axum::{Json, Router, extract::State, routing::post};
use axum_valid::Valid;

use crate::{
    dto::notifications::{SubscribeEmailRequest, SubscribeEmailResponse},
    error::AppError,
    services::notification_service,
    state::SharedState,
};

/// Routes managing high-score mail subscriptions.
pub fn router() -> Router<SharedState> {
    Router::new().route("/notifications/subscriptions", post(subscribe_email))
}

/// Ask for high-score mail at the given address.
#[utoipa::path(
    post,
    path = "/notifications/subscriptions",
    tag = "notifications",
    request_body = SubscribeEmailRequest,
    responses(
        (status = 200, description = "Subscription processed", body = SubscribeEmailResponse),
        (status = 400, description = "Invalid address"),
        (status = 503, description = "Subscription registry unavailable"),
    )
)]
pub async fn subscribe_email(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<SubscribeEmailRequest>>,
) -> Result<Json<SubscribeEmailResponse>, AppError> {
    let response = notification_service::subscribe_email(&state, payload).await?;
    Ok(Json(response))
}
