//! Error types for the MongoDB storage implementation.

use thiserror::Error;

/// Convenient result alias returning [`MongoDaoError`] failures.
pub type MongoResult<T> = Result<T, MongoDaoError>;

/// Failures that can occur while talking to MongoDB.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// Required environment variable is missing.
    #[error("missing MongoDB environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// The connection URI could not be parsed.
    #[error("invalid MongoDB URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: mongodb::error::Error,
    },
    /// Building the client from parsed options failed.
    #[error("failed to construct MongoDB client")]
    ClientConstruction {
        #[source]
        source: mongodb::error::Error,
    },
    /// The server never answered the initial ping.
    #[error("MongoDB did not answer the initial ping after {attempts} attempts")]
    InitialPing {
        attempts: u32,
        #[source]
        source: mongodb::error::Error,
    },
    /// Index creation failed for a collection.
    #[error("failed to ensure index `{index}` on `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: mongodb::error::Error,
    },
    /// A court record could not be written.
    #[error("failed to save court {number}")]
    SaveCourt {
        number: u16,
        #[source]
        source: mongodb::error::Error,
    },
    /// Court records could not be read.
    #[error("failed to load courts")]
    LoadCourts {
        #[source]
        source: mongodb::error::Error,
    },
    /// A game state document could not be written.
    #[error("failed to save game state for court {number}")]
    SaveState {
        number: u16,
        #[source]
        source: mongodb::error::Error,
    },
    /// A game state document could not be read.
    #[error("failed to load game state for court {number}")]
    LoadState {
        number: u16,
        #[source]
        source: mongodb::error::Error,
    },
    /// A game state document could not be deleted.
    #[error("failed to delete game state for court {number}")]
    DeleteState {
        number: u16,
        #[source]
        source: mongodb::error::Error,
    },
    /// A match history record could not be written.
    #[error("failed to record match on court {number}")]
    RecordMatch {
        number: u16,
        #[source]
        source: mongodb::error::Error,
    },
    /// Match history records could not be read.
    #[error("failed to list match history")]
    ListMatches {
        #[source]
        source: mongodb::error::Error,
    },
    /// The health ping failed.
    #[error("MongoDB health ping failed")]
    HealthPing {
        #[source]
        source: mongodb::error::Error,
    },
}
