use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use thiserror::Error;
use uuid::Uuid;

use crate::dao::storage::StorageError;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Server error code reported when a unique index rejects a write.
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("missing MongoDB environment variable `{var}`")]
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
    #[error("failed to look up team for roll number(s) {roll_nos:?}")]
    FindTeam {
        roll_nos: Vec<String>,
        #[source]
        source: MongoError,
    },
    #[error("failed to insert team `{id}`")]
    InsertTeam {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to update score of team `{id}`")]
    UpdateScore {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list teams")]
    ListTeams {
        #[source]
        source: MongoError,
    },
    #[error("failed to replace team collection")]
    ReplaceTeams {
        #[source]
        source: MongoError,
    },
    #[error("failed to upsert team with members {members:?}")]
    UpsertTeam {
        members: Vec<String>,
        #[source]
        source: MongoError,
    },
}

impl MongoDaoError {
    /// Driver error carried by the variant, if any.
    fn driver_error(&self) -> Option<&MongoError> {
        match self {
            MongoDaoError::MissingEnvVar { .. } => None,
            MongoDaoError::InvalidUri { source, .. }
            | MongoDaoError::ClientConstruction { source }
            | MongoDaoError::InitialPing { source, .. }
            | MongoDaoError::HealthPing { source }
            | MongoDaoError::EnsureIndex { source, .. }
            | MongoDaoError::FindTeam { source, .. }
            | MongoDaoError::InsertTeam { source, .. }
            | MongoDaoError::UpdateScore { source, .. }
            | MongoDaoError::ListTeams { source }
            | MongoDaoError::ReplaceTeams { source }
            | MongoDaoError::UpsertTeam { source, .. } => Some(source),
        }
    }
}

/// Whether the driver error comes from the unique member index.
pub(super) fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::InsertMany(failure) => failure.write_errors.as_ref().is_some_and(|errors| {
            errors
                .iter()
                .any(|write_error| write_error.code == DUPLICATE_KEY_CODE)
        }),
        _ => false,
    }
}

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        if err.driver_error().is_some_and(is_duplicate_key) {
            return StorageError::conflict(err.to_string());
        }
        StorageError::unavailable(err.to_string(), err)
    }
}
