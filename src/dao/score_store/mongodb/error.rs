use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("environment variable `{var}` is not set")]
    MissingEnvVar { var: &'static str },
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to save score `{id}`")]
    SaveScore {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to scan scores")]
    ScanScores {
        #[source]
        source: MongoError,
    },
    #[error("failed to create player `{username}`")]
    CreatePlayer {
        username: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to load player `{username}`")]
    LoadPlayer {
        username: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to update player `{username}`")]
    UpdatePlayer {
        username: String,
        #[source]
        source: MongoError,
    },
}
