use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Payload asking for high-score mail at the given address.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubscribeEmailRequest {
    #[validate(email)]
    pub email: String,
}

/// Outcome of a subscription request.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubscribeEmailResponse {
    pub message: String,
}

impl SubscribeEmailResponse {
    /// The address already receives mail; nothing was forwarded.
    pub fn already_confirmed() -> Self {
        Self {
            message: "Email is already subscribed".to_owned(),
        }
    }

    /// The registry accepted the subscription request.
    pub fn requested() -> Self {
        Self {
            message: "Subscription requested; confirmation pending".to_owned(),
        }
    }
}
