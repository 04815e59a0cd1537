use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::players::{PlayerStatsResponse, RegisterPlayerRequest, RegisterPlayerResponse},
    error::AppError,
    services::player_service,
    state::SharedState,
};

/// Routes handling player registration and statistics.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/players", post(register_player))
        .route("/players/{username}/stats", get(player_stats))
}

/// Register a player ahead of their first game.
#[utoipa::path(
    post,
    path = "/players",
    tag = "players",
    request_body = RegisterPlayerRequest,
    responses(
        (status = 200, description = "Registration processed", body = RegisterPlayerResponse),
        (status = 400, description = "Invalid registration"),
        (status = 503, description = "Storage unavailable"),
    )
)]
pub async fn register_player(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<RegisterPlayerRequest>>,
) -> Result<Json<RegisterPlayerResponse>, AppError> {
    let response = player_service::register_player(&state, payload).await?;
    Ok(Json(response))
}

/// Read the aggregate counters for one player.
#[utoipa::path(
    get,
    path = "/players/{username}/stats",
    tag = "players",
    params(("username" = String, Path, description = "Player the counters belong to")),
    responses(
        (status = 200, description = "Aggregate counters", body = PlayerStatsResponse),
        (status = 404, description = "Unknown player"),
        (status = 503, description = "Storage unavailable"),
    )
)]
pub async fn player_stats(
    State(state): State<SharedState>,
    Path(username): Path<String>,
) -> Result<Json<PlayerStatsResponse>, AppError> {
    let response = player_service::player_stats(&state, &username).await?;
    Ok(Json(response))
}
