use tracing::{debug, info, warn};

use crate::{
    dao::models::GameLevel,
    dto::notifications::{SubscribeEmailRequest, SubscribeEmailResponse},
    error::ServiceError,
    notify::NotificationMessage,
    state::SharedState,
};

/// Mail a congratulation for a score that made the board.
///
/// Best-effort end to end: a missing backend, an ineligible recipient, or a
/// failed send all end here with a log line. The submission that triggered
/// the mail has already been recorded and reported successful.
pub async fn notify_high_score(
    state: &SharedState,
    recipient: &str,
    username: &str,
    score: u32,
    level: Option<GameLevel>,
) {
    let Some(registry) = state.registry().await else {
        debug!("no subscription registry configured; skipping high-score mail");
        return;
    };

    if !state
        .eligibility()
        .is_eligible(registry.as_ref(), recipient)
        .await
    {
        debug!(user = %username, "recipient not confirmed; skipping high-score mail");
        return;
    }

    let Some(notifier) = state.notifier().await else {
        debug!("no mailer configured; skipping high-score mail");
        return;
    };

    let config = state.config();
    let message = NotificationMessage {
        sender: config.notification_sender().to_owned(),
        recipient: recipient.to_owned(),
        subject: config.notification_subject().to_owned(),
        body: congratulation_body(username, score, level),
    };

    match notifier.send(message).await {
        Ok(()) => info!(user = %username, score, "high-score mail sent"),
        Err(err) => warn!(user = %username, error = %err, "high-score mail failed"),
    }
}

/// Ask the registry to start an email subscription, unless the address is
/// already confirmed.
pub async fn subscribe_email(
    state: &SharedState,
    request: SubscribeEmailRequest,
) -> Result<SubscribeEmailResponse, ServiceError> {
    let address = request.email.trim().to_lowercase();

    let registry = state
        .registry()
        .await
        .ok_or(ServiceError::RegistryNotConfigured)?;

    if state
        .eligibility()
        .is_eligible(registry.as_ref(), &address)
        .await
    {
        debug!("address already confirmed; not forwarding subscription request");
        return Ok(SubscribeEmailResponse::already_confirmed());
    }

    registry.subscribe_email(&address).await?;
    Ok(SubscribeEmailResponse::requested())
}

fn congratulation_body(username: &str, score: u32, level: Option<GameLevel>) -> String {
    match level {
        Some(level) => format!(
            "Congratulations {username}! Your score of {score} made the {level} leaderboard."
        ),
        None => format!("Congratulations {username}! Your score of {score} made the leaderboard."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_mentions_player_score_and_level() {
        let body = congratulation_body("ada", 97, Some(GameLevel::Hard));
        assert_eq!(
            body,
            "Congratulations ada! Your score of 97 made the hard leaderboard."
        );
    }

    #[test]
    fn body_without_level_stays_generic() {
        let body = congratulation_body("ada", 97, None);
        assert_eq!(
            body,
            "Congratulations ada! Your score of 97 made the leaderboard."
        );
    }
}
