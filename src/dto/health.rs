use serde::Serialize;
use utoipa::ToSchema;

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status ("ok" or "degraded").
    pub status: String,
    /// Outcome of the storage ping behind this response.
    pub storage: String,
}

impl HealthResponse {
    fn new(status: &str, storage: &str) -> Self {
        Self {
            status: status.to_owned(),
            storage: storage.to_owned(),
        }
    }

    /// Storage answered the ping.
    pub fn ok() -> Self {
        Self::new("ok", "ok")
    }

    /// A backend is installed but did not answer the ping.
    pub fn storage_failing() -> Self {
        Self::new("ok", "failing")
    }

    /// No storage backend is installed.
    pub fn degraded() -> Self {
        Self::new("degraded", "absent")
    }
}
