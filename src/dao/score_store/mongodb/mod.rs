mod config;
mod connection;
mod error;
mod models;
pub mod store;

pub use config::{MONGO_URI_ENV, MongoConfig};
pub use error::MongoDaoError;
pub use store::MongoScoreStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}
