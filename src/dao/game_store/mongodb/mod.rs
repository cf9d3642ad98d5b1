//! MongoDB storage backend.

mod connection;
mod error;
mod models;
/// Connection-holding store implementing the [`GameStore`](super::GameStore) trait.
pub mod store;

/// Connection configuration for the MongoDB backend.
pub mod config;

pub use config::MongoConfig;
pub use error::MongoDaoError;
pub use store::MongoGameStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}
