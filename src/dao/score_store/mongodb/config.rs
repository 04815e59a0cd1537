//! Connection settings for the MongoDB score store.

use std::env;
use std::time::Duration;

use mongodb::options::ClientOptions;

use super::error::{MongoDaoError, MongoResult};

/// Environment variable holding the MongoDB connection string.
pub const MONGO_URI_ENV: &str = "MONGO_URI";
/// Environment variable overriding the database name.
pub const MONGO_DB_ENV: &str = "MONGO_DB";

const DEFAULT_DATABASE_NAME: &str = "brainburst";

/// Upper bound on server selection so a dead cluster fails fast instead of
/// stalling score submissions.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Parsed client options plus the database the store operates on.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub(super) options: ClientOptions,
    pub(super) database_name: String,
}

impl MongoConfig {
    /// Parses a connection string into client options, bounding the
    /// connection timeouts.
    pub async fn from_uri(uri: &str, database_name: Option<String>) -> MongoResult<Self> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|source| MongoDaoError::InvalidUri {
                uri: uri.to_owned(),
                source,
            })?;
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        options.connect_timeout = Some(CONNECT_TIMEOUT);

        Ok(Self {
            options,
            database_name: database_name.unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_owned()),
        })
    }

    /// Builds the configuration from `MONGO_URI` and `MONGO_DB`.
    pub async fn from_env() -> MongoResult<Self> {
        let uri = env::var(MONGO_URI_ENV).map_err(|_| MongoDaoError::MissingEnvVar {
            var: MONGO_URI_ENV,
        })?;
        let database_name = env::var(MONGO_DB_ENV).ok();
        Self::from_uri(&uri, database_name).await
    }
}
