/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Leaderboard ranking and board-membership checks.
pub mod leaderboard_service;
/// High-score mail and subscription handling.
pub mod notification_service;
/// Player registration and aggregate lookups.
pub mod player_service;
/// Practice question generation.
pub mod question_service;
/// Score submission orchestration.
pub mod score_service;
/// Per-player aggregate tracking.
pub mod stats_service;
/// Storage reconnection coordinator.
pub mod storage_supervisor;
