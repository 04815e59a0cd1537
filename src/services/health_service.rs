use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report service health, pinging the storage backend when one is installed.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    if state.is_degraded().await {
        warn!("storage unavailable (degraded mode)");
        return HealthResponse::degraded();
    }

    match state.score_store().await {
        Some(store) => match store.health_check().await {
            Ok(()) => HealthResponse::ok(),
            Err(err) => {
                warn!(error = %err, "storage health check failed");
                HealthResponse::storage_failing()
            }
        },
        // The store was cleared between the two reads.
        None => HealthResponse::degraded(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::AppConfig, dao::score_store::memory::MemoryScoreStore, state::AppState};

    #[tokio::test]
    async fn reports_ok_with_a_healthy_store() {
        let state = AppState::new(AppConfig::default());
        state
            .install_score_store(Arc::new(MemoryScoreStore::new()))
            .await;

        let response = health_status(&state).await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.storage, "ok");
    }

    #[tokio::test]
    async fn reports_degraded_without_a_store() {
        let state = AppState::new(AppConfig::default());

        let response = health_status(&state).await;
        assert_eq!(response.status, "degraded");
    }

    #[tokio::test]
    async fn clearing_the_store_flips_back_to_degraded() {
        let state = AppState::new(AppConfig::default());
        state
            .install_score_store(Arc::new(MemoryScoreStore::new()))
            .await;
        assert_eq!(health_status(&state).await.status, "ok");

        state.clear_score_store().await;
        assert_eq!(health_status(&state).await.status, "degraded");
    }
}
