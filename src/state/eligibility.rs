//! TTL-bounded cache of confirmed notification recipients.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::notify::SubscriptionRegistry;

/// One immutable view of the confirmed recipient set.
#[derive(Debug, Default)]
struct EligibilitySnapshot {
    /// Normalized (trimmed, lower-cased) email addresses.
    recipients: HashSet<String>,
    /// End of the refresh that produced this snapshot. `None` until the
    /// first successful refresh.
    refreshed_at: Option<Instant>,
}

/// Cache of who may receive high-score mail, refreshed from the subscription
/// registry at most once per TTL window.
///
/// Lookups against a fresh snapshot never touch the registry. Once the
/// snapshot expires, the first caller performs the refresh while concurrent
/// callers wait on the gate and then reuse the result. A failed refresh keeps
/// the previous snapshot; the cache answers from stale data rather than
/// failing the caller.
pub struct EligibilityCache {
    snapshot: RwLock<Arc<EligibilitySnapshot>>,
    refresh_gate: Mutex<()>,
    ttl: Duration,
}

impl EligibilityCache {
    /// Create an empty cache; every address is ineligible until a refresh.
    pub fn new(ttl: Duration) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(EligibilitySnapshot::default())),
            refresh_gate: Mutex::new(()),
            ttl,
        }
    }

    /// Whether `address` belongs to a confirmed email subscription.
    ///
    /// Refreshes the snapshot first when it has expired. Comparison happens
    /// on the normalized form of both sides.
    pub async fn is_eligible(&self, registry: &dyn SubscriptionRegistry, address: &str) -> bool {
        let wanted = normalize(address);
        let snapshot = self.fresh_snapshot(registry).await;
        snapshot.recipients.contains(&wanted)
    }

    async fn fresh_snapshot(&self, registry: &dyn SubscriptionRegistry) -> Arc<EligibilitySnapshot> {
        {
            let snapshot = self.snapshot.read().await.clone();
            if self.is_fresh(&snapshot) {
                return snapshot;
            }
        }

        let _gate = self.refresh_gate.lock().await;

        // Another caller may have refreshed while we waited on the gate.
        {
            let snapshot = self.snapshot.read().await.clone();
            if self.is_fresh(&snapshot) {
                return snapshot;
            }
        }

        match registry.list_subscriptions().await {
            Ok(subscriptions) => {
                let recipients: HashSet<String> = subscriptions
                    .iter()
                    .filter(|subscription| subscription.is_confirmed_email())
                    .map(|subscription| normalize(&subscription.endpoint))
                    .collect();
                debug!(
                    recipients = recipients.len(),
                    "eligibility snapshot refreshed"
                );

                let refreshed = Arc::new(EligibilitySnapshot {
                    recipients,
                    refreshed_at: Some(Instant::now()),
                });
                *self.snapshot.write().await = refreshed.clone();
                refreshed
            }
            Err(err) => {
                warn!(error = %err, "eligibility refresh failed, serving previous snapshot");
                self.snapshot.read().await.clone()
            }
        }
    }

    fn is_fresh(&self, snapshot: &EligibilitySnapshot) -> bool {
        snapshot
            .refreshed_at
            .is_some_and(|at| at.elapsed() < self.ttl)
    }
}

fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::future::BoxFuture;

    use super::*;
    use crate::notify::{RegistryError, RegistryResult, SubscriptionEntity};

    const TTL: Duration = Duration::from_secs(300);

    fn confirmed(endpoint: &str) -> SubscriptionEntity {
        SubscriptionEntity {
            endpoint: endpoint.to_owned(),
            protocol: "email".to_owned(),
            pending: false,
        }
    }

    fn pending(endpoint: &str) -> SubscriptionEntity {
        SubscriptionEntity {
            endpoint: endpoint.to_owned(),
            protocol: "email".to_owned(),
            pending: true,
        }
    }

    /// Registry stub that pops one scripted response per call and counts
    /// calls. Panics when called more often than scripted.
    struct ScriptedRegistry {
        calls: AtomicUsize,
        script: StdMutex<VecDeque<Result<Vec<SubscriptionEntity>, ()>>>,
    }

    impl ScriptedRegistry {
        fn new(script: Vec<Result<Vec<SubscriptionEntity>, ()>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                script: StdMutex::new(script.into()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SubscriptionRegistry for ScriptedRegistry {
        fn list_subscriptions(
            &self,
        ) -> BoxFuture<'static, RegistryResult<Vec<SubscriptionEntity>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .expect("registry called more often than scripted");
            Box::pin(async move {
                next.map_err(|()| {
                    RegistryError::unavailable(
                        "scripted failure".to_owned(),
                        io::Error::other("scripted"),
                    )
                })
            })
        }

        fn subscribe_email(&self, _address: &str) -> BoxFuture<'static, RegistryResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_normalizes_both_sides() {
        let registry = ScriptedRegistry::new(vec![Ok(vec![confirmed("  Ada@Example.COM ")])]);
        let cache = EligibilityCache::new(TTL);

        assert!(cache.is_eligible(&registry, "ADA@example.com").await);
        assert!(!cache.is_eligible(&registry, "bob@example.com").await);
        assert_eq!(registry.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_and_foreign_protocols_are_ineligible() {
        let registry = ScriptedRegistry::new(vec![Ok(vec![
            pending("ada@example.com"),
            SubscriptionEntity {
                endpoint: "bob@example.com".to_owned(),
                protocol: "sms".to_owned(),
                pending: false,
            },
        ])]);
        let cache = EligibilityCache::new(TTL);

        assert!(!cache.is_eligible(&registry, "ada@example.com").await);
        assert!(!cache.is_eligible(&registry, "bob@example.com").await);
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_snapshot_serves_lookups_without_requery() {
        let registry = ScriptedRegistry::new(vec![Ok(vec![confirmed("ada@example.com")])]);
        let cache = EligibilityCache::new(TTL);

        for _ in 0..5 {
            assert!(cache.is_eligible(&registry, "ada@example.com").await);
        }
        tokio::time::advance(TTL - Duration::from_secs(1)).await;
        assert!(cache.is_eligible(&registry, "ada@example.com").await);

        assert_eq!(registry.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_triggers_exactly_one_refresh() {
        let registry = ScriptedRegistry::new(vec![
            Ok(vec![confirmed("ada@example.com")]),
            Ok(vec![confirmed("bob@example.com")]),
        ]);
        let cache = EligibilityCache::new(TTL);

        assert!(cache.is_eligible(&registry, "ada@example.com").await);
        tokio::time::advance(TTL + Duration::from_secs(1)).await;

        let (ada, bob) = tokio::join!(
            cache.is_eligible(&registry, "ada@example.com"),
            cache.is_eligible(&registry, "bob@example.com"),
        );
        assert!(!ada);
        assert!(bob);
        assert_eq!(registry.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_serves_stale_snapshot_and_retries_later() {
        let registry = ScriptedRegistry::new(vec![
            Ok(vec![confirmed("ada@example.com")]),
            Err(()),
            Ok(vec![]),
        ]);
        let cache = EligibilityCache::new(TTL);

        assert!(cache.is_eligible(&registry, "ada@example.com").await);

        // Expired snapshot plus a failing registry: stale data still answers.
        tokio::time::advance(TTL + Duration::from_secs(1)).await;
        assert!(cache.is_eligible(&registry, "ada@example.com").await);
        assert_eq!(registry.calls(), 2);

        // The failure did not reset the clock, so the next call retries.
        assert!(!cache.is_eligible(&registry, "ada@example.com").await);
        assert_eq!(registry.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_cache_defaults_to_ineligible_on_failure() {
        let registry = ScriptedRegistry::new(vec![Err(())]);
        let cache = EligibilityCache::new(TTL);

        assert!(!cache.is_eligible(&registry, "ada@example.com").await);
    }
}
