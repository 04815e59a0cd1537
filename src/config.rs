//! Application-level configuration loading for leaderboard and notification
//! tunables.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "BRAINBURST_BACK_CONFIG_PATH";

/// Number of leaderboard slots a score must land in to trigger mail.
const DEFAULT_LEADERBOARD_SIZE: usize = 10;
/// How long a confirmed-recipients snapshot stays valid.
const DEFAULT_ELIGIBILITY_TTL_SECS: u64 = 300;
const DEFAULT_SENDER: &str = "no-reply@brainburst.example";
const DEFAULT_SUBJECT: &str = "New BrainBurst high score!";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    leaderboard_size: usize,
    eligibility_ttl: Duration,
    notification_sender: String,
    notification_subject: String,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        leaderboard_size = app_config.leaderboard_size,
                        "loaded configuration from file"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// How many top entries count as "on the board" for notifications.
    pub fn leaderboard_size(&self) -> usize {
        self.leaderboard_size
    }

    /// Lifetime of one confirmed-recipients snapshot.
    pub fn eligibility_ttl(&self) -> Duration {
        self.eligibility_ttl
    }

    /// Sender address stamped on outgoing congratulation mail.
    pub fn notification_sender(&self) -> &str {
        &self.notification_sender
    }

    /// Subject line for congratulation mail.
    pub fn notification_subject(&self) -> &str {
        &self.notification_subject
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            eligibility_ttl: Duration::from_secs(DEFAULT_ELIGIBILITY_TTL_SECS),
            notification_sender: DEFAULT_SENDER.to_owned(),
            notification_subject: DEFAULT_SUBJECT.to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    leaderboard_size: Option<usize>,
    eligibility_ttl_secs: Option<u64>,
    notification_sender: Option<String>,
    notification_subject: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            // A zero-slot board would never notify anyone.
            leaderboard_size: value
                .leaderboard_size
                .unwrap_or(defaults.leaderboard_size)
                .max(1),
            eligibility_ttl: value
                .eligibility_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.eligibility_ttl),
            notification_sender: value
                .notification_sender
                .unwrap_or(defaults.notification_sender),
            notification_subject: value
                .notification_subject
                .unwrap_or(defaults.notification_subject),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
