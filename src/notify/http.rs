//! HTTP implementations of the notification traits, speaking to the
//! subscription-registry and mailer services the deployment fronts.

use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    NotificationMessage, Notifier, NotifyError, NotifyResult, RegistryError, RegistryResult,
    SubscriptionEntity, SubscriptionRegistry,
};

/// Convenient result alias returning [`HttpNotifyError`] failures.
pub type HttpNotifyResult<T> = Result<T, HttpNotifyError>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_TOPIC: &str = "high-scores";

/// Failures that can occur while talking to the registry or mailer.
#[derive(Debug, Error)]
pub enum HttpNotifyError {
    /// Required environment variable is missing.
    #[error("missing notification environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build notification HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent or timed out.
    #[error("failed to send notification request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The service answered with an unexpected status code.
    #[error("unexpected notification response status {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    /// Response payload could not be parsed into JSON.
    #[error("failed to decode notification response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<HttpNotifyError> for RegistryError {
    fn from(err: HttpNotifyError) -> Self {
        RegistryError::unavailable(err.to_string(), err)
    }
}

impl From<HttpNotifyError> for NotifyError {
    fn from(err: HttpNotifyError) -> Self {
        NotifyError::unavailable(err.to_string(), err)
    }
}

/// Runtime configuration describing how to reach the subscription registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub base_url: String,
    pub topic: String,
}

impl RegistryConfig {
    /// Construct a configuration from an explicit base URL and topic name.
    pub fn new(base_url: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            topic: topic.into(),
        }
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> HttpNotifyResult<Self> {
        let base_url =
            std::env::var("REGISTRY_BASE_URL").map_err(|_| HttpNotifyError::MissingEnvVar {
                var: "REGISTRY_BASE_URL",
            })?;
        let topic = std::env::var("REGISTRY_TOPIC").unwrap_or_else(|_| DEFAULT_TOPIC.to_owned());
        Ok(Self::new(base_url, topic))
    }
}

/// Runtime configuration describing how to reach the mailer service.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub base_url: String,
}

impl MailerConfig {
    /// Construct a configuration from an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> HttpNotifyResult<Self> {
        let base_url =
            std::env::var("MAILER_BASE_URL").map_err(|_| HttpNotifyError::MissingEnvVar {
                var: "MAILER_BASE_URL",
            })?;
        Ok(Self::new(base_url))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SubscriptionStatus {
    /// Absent status is treated as unconfirmed.
    #[default]
    Pending,
    Confirmed,
}

#[derive(Debug, Deserialize)]
struct SubscriptionDocument {
    protocol: String,
    endpoint: String,
    #[serde(default)]
    status: SubscriptionStatus,
}

impl From<SubscriptionDocument> for SubscriptionEntity {
    fn from(value: SubscriptionDocument) -> Self {
        Self {
            endpoint: value.endpoint,
            protocol: value.protocol,
            pending: value.status == SubscriptionStatus::Pending,
        }
    }
}

#[derive(Serialize)]
struct SubscribeRequest<'a> {
    protocol: &'a str,
    endpoint: &'a str,
}

#[derive(Serialize)]
struct OutboundMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Registry client keeping subscriptions for a single topic.
#[derive(Clone)]
pub struct HttpSubscriptionRegistry {
    client: Client,
    base_url: Arc<str>,
    topic: Arc<str>,
}

impl HttpSubscriptionRegistry {
    /// Build a registry client with a bounded request timeout.
    pub fn new(config: RegistryConfig) -> HttpNotifyResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| HttpNotifyError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            topic: Arc::from(config.topic),
        })
    }

    fn subscriptions_path(&self) -> String {
        format!("topics/{}/subscriptions", self.topic)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        self.client.request(method, url)
    }

    async fn list_subscriptions(&self) -> HttpNotifyResult<Vec<SubscriptionEntity>> {
        let path = self.subscriptions_path();
        let response = self
            .request(Method::GET, &path)
            .send()
            .await
            .map_err(|source| HttpNotifyError::RequestSend {
                path: path.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(HttpNotifyError::RequestStatus {
                path,
                status: response.status(),
            });
        }

        let documents = response
            .json::<Vec<SubscriptionDocument>>()
            .await
            .map_err(|source| HttpNotifyError::DecodeResponse { path, source })?;

        Ok(documents.into_iter().map(SubscriptionEntity::from).collect())
    }

    async fn subscribe_email(&self, address: String) -> HttpNotifyResult<()> {
        let path = self.subscriptions_path();
        let request = SubscribeRequest {
            protocol: "email",
            endpoint: &address,
        };

        let response = self
            .request(Method::POST, &path)
            .json(&request)
            .send()
            .await
            .map_err(|source| HttpNotifyError::RequestSend {
                path: path.clone(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(HttpNotifyError::RequestStatus {
                path,
                status: response.status(),
            })
        }
    }
}

impl SubscriptionRegistry for HttpSubscriptionRegistry {
    fn list_subscriptions(&self) -> BoxFuture<'static, RegistryResult<Vec<SubscriptionEntity>>> {
        let registry = self.clone();
        Box::pin(async move { registry.list_subscriptions().await.map_err(Into::into) })
    }

    fn subscribe_email(&self, address: &str) -> BoxFuture<'static, RegistryResult<()>> {
        let registry = self.clone();
        let address = address.to_owned();
        Box::pin(async move { registry.subscribe_email(address).await.map_err(Into::into) })
    }
}

/// Mailer client handing messages to the delivery service.
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    base_url: Arc<str>,
}

impl HttpMailer {
    const MESSAGES_PATH: &'static str = "messages";

    /// Build a mailer client with a bounded request timeout.
    pub fn new(config: MailerConfig) -> HttpNotifyResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| HttpNotifyError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
        })
    }

    async fn send(&self, message: NotificationMessage) -> HttpNotifyResult<()> {
        let url = format!("{}/{}", self.base_url, Self::MESSAGES_PATH);
        let outbound = OutboundMessage {
            from: &message.sender,
            to: &message.recipient,
            subject: &message.subject,
            body: &message.body,
        };

        let response = self
            .client
            .post(&url)
            .json(&outbound)
            .send()
            .await
            .map_err(|source| HttpNotifyError::RequestSend {
                path: Self::MESSAGES_PATH.to_owned(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(HttpNotifyError::RequestStatus {
                path: Self::MESSAGES_PATH.to_owned(),
                status: response.status(),
            })
        }
    }
}

impl Notifier for HttpMailer {
    fn send(&self, message: NotificationMessage) -> BoxFuture<'static, NotifyResult<()>> {
        let mailer = self.clone();
        Box::pin(async move { mailer.send(message).await.map_err(Into::into) })
    }
}
