//! Outbound notification plumbing: subscription registry and mailer.
//!
//! Everything here is best-effort from the caller's point of view. The
//! submission path records scores whether or not a registry or mailer is
//! reachable; failures are logged by the services and never surfaced to the
//! player.

use std::error::Error;

use futures::future::BoxFuture;
use thiserror::Error;

#[cfg(feature = "http-notify")]
pub mod http;

/// Result alias for subscription-registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Error raised by subscription-registry backends.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("subscription registry unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl RegistryError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        RegistryError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

/// Result alias for mail-delivery operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Error raised by notification backends.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notifier unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl NotifyError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        NotifyError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

/// One endpoint registered on the notification topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionEntity {
    pub endpoint: String,
    pub protocol: String,
    /// Still waiting for the endpoint owner to confirm.
    pub pending: bool,
}

impl SubscriptionEntity {
    /// Whether this subscription can receive mail right now.
    pub fn is_confirmed_email(&self) -> bool {
        self.protocol.eq_ignore_ascii_case("email") && !self.pending
    }
}

/// One outbound mail.
#[derive(Debug, Clone)]
pub struct NotificationMessage {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Source of truth for who may be notified.
pub trait SubscriptionRegistry: Send + Sync {
    /// List every subscription attached to the topic, confirmed or not.
    fn list_subscriptions(&self) -> BoxFuture<'static, RegistryResult<Vec<SubscriptionEntity>>>;

    /// Ask the registry to start an email subscription for `address`.
    ///
    /// The registry drives its own confirmation round-trip; a success here
    /// only means the request was accepted.
    fn subscribe_email(&self, address: &str) -> BoxFuture<'static, RegistryResult<()>>;
}

/// Delivery channel for congratulation mails.
pub trait Notifier: Send + Sync {
    /// Hand one message to the delivery service.
    fn send(&self, message: NotificationMessage) -> BoxFuture<'static, NotifyResult<()>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(protocol: &str, pending: bool) -> SubscriptionEntity {
        SubscriptionEntity {
            endpoint: "ada@example.com".to_owned(),
            protocol: protocol.to_owned(),
            pending,
        }
    }

    #[test]
    fn only_confirmed_email_subscriptions_are_eligible() {
        assert!(subscription("email", false).is_confirmed_email());
        assert!(subscription("EMAIL", false).is_confirmed_email());
        assert!(!subscription("email", true).is_confirmed_email());
        assert!(!subscription("sms", false).is_confirmed_email());
    }
}
