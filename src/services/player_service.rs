use crate::{
    dao::models::PlayerEntity,
    dto::players::{PlayerStatsResponse, RegisterPlayerRequest, RegisterPlayerResponse},
    error::ServiceError,
    state::SharedState,
};

/// Create the aggregate row for a new player.
///
/// Put-if-new: registering a username that already exists reports success
/// without touching the stored row, so a replayed registration can never
/// reset someone's counters.
pub async fn register_player(
    state: &SharedState,
    request: RegisterPlayerRequest,
) -> Result<RegisterPlayerResponse, ServiceError> {
    let username = request.username;
    if username.trim().is_empty() {
        return Err(ServiceError::InvalidInput(
            "username must not be blank".to_owned(),
        ));
    }

    let store = state.require_score_store().await?;
    let created = store
        .create_player(PlayerEntity::new(username.clone(), request.email))
        .await?;

    Ok(RegisterPlayerResponse { username, created })
}

/// Read the aggregate counters kept for one player.
pub async fn player_stats(
    state: &SharedState,
    username: &str,
) -> Result<PlayerStatsResponse, ServiceError> {
    let store = state.require_score_store().await?;
    let Some(player) = store.find_player(username).await? else {
        return Err(ServiceError::NotFound(format!(
            "player `{username}` not found"
        )));
    };

    Ok(player.into())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::AppConfig, dao::score_store::memory::MemoryScoreStore, state::AppState};

    async fn state_with_memory_store() -> SharedState {
        let state = AppState::new(AppConfig::default());
        state
            .install_score_store(Arc::new(MemoryScoreStore::new()))
            .await;
        state
    }

    fn request(username: &str, email: Option<&str>) -> RegisterPlayerRequest {
        RegisterPlayerRequest {
            username: username.to_owned(),
            email: email.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn registration_is_idempotent_without_overwrite() {
        let state = state_with_memory_store().await;

        let first = register_player(&state, request("ada", Some("ada@example.com")))
            .await
            .unwrap();
        assert!(first.created);

        let second = register_player(&state, request("ada", Some("other@example.com")))
            .await
            .unwrap();
        assert!(!second.created);

        let stats = player_stats(&state, "ada").await.unwrap();
        assert_eq!(stats.total_games_played, 0);
        assert_eq!(stats.highest_score, 0);
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let state = state_with_memory_store().await;
        let result = register_player(&state, request("   ", None)).await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn unknown_player_stats_are_not_found() {
        let state = state_with_memory_store().await;
        let result = player_stats(&state, "ghost").await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn degraded_mode_rejects_registration() {
        let state = AppState::new(AppConfig::default());
        let result = register_player(&state, request("ada", None)).await;
        assert!(matches!(result, Err(ServiceError::Degraded)));
    }
}
