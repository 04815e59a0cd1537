use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for BrainBurst Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::scores::submit_score,
        crate::routes::leaderboard::leaderboard,
        crate::routes::players::register_player,
        crate::routes::players::player_stats,
        crate::routes::question::question,
        crate::routes::notifications::subscribe_email,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::scores::SubmitScoreRequest,
            crate::dto::scores::SubmitScoreResponse,
            crate::dto::leaderboard::LeaderboardRow,
            crate::dto::players::RegisterPlayerRequest,
            crate::dto::players::RegisterPlayerResponse,
            crate::dto::players::PlayerStatsResponse,
            crate::dto::question::QuestionResponse,
            crate::dto::notifications::SubscribeEmailRequest,
            crate::dto::notifications::SubscribeEmailResponse,
            crate::dao::models::GameLevel,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "scores", description = "Score submission"),
        (name = "leaderboard", description = "Ranked score listings"),
        (name = "players", description = "Player registration and statistics"),
        (name = "question", description = "Practice question generation"),
        (name = "notifications", description = "High-score mail subscriptions"),
    )
)]
pub struct ApiDoc;
