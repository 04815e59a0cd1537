pub mod eligibility;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    config::AppConfig,
    dao::score_store::ScoreStore,
    error::ServiceError,
    notify::{Notifier, SubscriptionRegistry},
    state::eligibility::EligibilityCache,
};

pub type SharedState = Arc<AppState>;

/// Central application state storing backend handles and shared caches.
pub struct AppState {
    score_store: RwLock<Option<Arc<dyn ScoreStore>>>,
    registry: RwLock<Option<Arc<dyn SubscriptionRegistry>>>,
    notifier: RwLock<Option<Arc<dyn Notifier>>>,
    eligibility: EligibilityCache,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            score_store: RwLock::new(None),
            registry: RwLock::new(None),
            notifier: RwLock::new(None),
            eligibility: EligibilityCache::new(config.eligibility_ttl()),
            config,
        })
    }

    /// Obtain a handle to the current score store, if one is installed.
    pub async fn score_store(&self) -> Option<Arc<dyn ScoreStore>> {
        let guard = self.score_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the score store or fail with the degraded-mode error.
    pub async fn require_score_store(&self) -> Result<Arc<dyn ScoreStore>, ServiceError> {
        self.score_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new score store implementation and leave degraded mode.
    pub async fn install_score_store(&self, store: Arc<dyn ScoreStore>) {
        let mut guard = self.score_store.write().await;
        *guard = Some(store);
    }

    /// Remove the current score store and enter degraded mode.
    pub async fn clear_score_store(&self) {
        let mut guard = self.score_store.write().await;
        guard.take();
    }

    /// Whether the application currently runs without a storage backend.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.score_store.read().await;
        guard.is_none()
    }

    /// Obtain a handle to the subscription registry, if one is configured.
    pub async fn registry(&self) -> Option<Arc<dyn SubscriptionRegistry>> {
        let guard = self.registry.read().await;
        guard.as_ref().cloned()
    }

    /// Install the subscription registry backend.
    pub async fn install_registry(&self, registry: Arc<dyn SubscriptionRegistry>) {
        let mut guard = self.registry.write().await;
        *guard = Some(registry);
    }

    /// Obtain a handle to the mailer, if one is configured.
    pub async fn notifier(&self) -> Option<Arc<dyn Notifier>> {
        let guard = self.notifier.read().await;
        guard.as_ref().cloned()
    }

    /// Install the mailer backend.
    pub async fn install_notifier(&self, notifier: Arc<dyn Notifier>) {
        let mut guard = self.notifier.write().await;
        *guard = Some(notifier);
    }

    /// Cache of confirmed notification recipients.
    pub fn eligibility(&self) -> &EligibilityCache {
        &self.eligibility
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
