use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use axum_valid::Valid;

use crate::{
    dto::leaderboard::{LeaderboardQuery, LeaderboardRow},
    error::AppError,
    services::leaderboard_service,
    state::SharedState,
};

/// Routes serving the ranked score listings.
pub fn router() -> Router<SharedState> {
    Router::new().route("/leaderboard", get(leaderboard))
}

/// Return the highest scores, optionally restricted to one difficulty.
#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "leaderboard",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Ordered top scores", body = [LeaderboardRow]),
        (status = 503, description = "Storage unavailable"),
    )
)]
pub async fn leaderboard(
    State(state): State<SharedState>,
    Valid(Query(query)): Valid<Query<LeaderboardQuery>>,
) -> Result<Json<Vec<LeaderboardRow>>, AppError> {
    let rows = leaderboard_service::top_scores(&state, query).await?;
    Ok(Json(rows))
}
