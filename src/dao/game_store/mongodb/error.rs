use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

/// Result alias for MongoDB DAO operations.
pub type MongoResult<T> = Result<T, MongoDaoError>;

/// Errors raised by the MongoDB backend, tagged with the failing operation.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// Connection URI could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// The offending URI.
        uri: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Required environment variable is not set.
    #[error("missing environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the variable.
        var: &'static str,
    },
    /// Client could not be built from the parsed options.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Server never answered the initial ping.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        /// Number of attempts made before giving up.
        attempts: u32,
        /// Driver error from the last attempt.
        #[source]
        source: MongoError,
    },
    /// Health-check ping failed on an established connection.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Index creation failed.
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        /// Collection the index belongs to.
        collection: &'static str,
        /// Index key description.
        index: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Game upsert failed.
    #[error("failed to save game `{id}`")]
    SaveGame {
        /// Game identifier.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Game or child-record load failed.
    #[error("failed to load game `{id}`")]
    LoadGame {
        /// Game identifier.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Current-slot lookup failed.
    #[error("failed to resolve the current game")]
    LoadCurrentGame {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Round-cursor update failed.
    #[error("failed to update game `{id}`")]
    UpdateGame {
        /// Game identifier.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Score replacement for a hole failed.
    #[error("failed to replace scores for hole {hole_number} of game `{id}`")]
    ReplaceScores {
        /// Game identifier.
        id: Uuid,
        /// Hole whose scores were being replaced.
        hole_number: u8,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Current-slot pointer write failed.
    #[error("failed to update the current game slot")]
    SessionPointer {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Cascade delete failed.
    #[error("failed to delete game `{id}`")]
    DeleteGame {
        /// Game identifier.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
}
