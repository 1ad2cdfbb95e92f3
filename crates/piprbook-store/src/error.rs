use piprbook_shared::ModelError;
use thiserror::Error;

use crate::store::Record;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing file is unusable: not read/write, not a JSON object, or
    /// missing one of the declared collections.
    #[error("Invalid database file: {0}")]
    InvalidDatabaseFile(String),

    /// A collection name that was not declared when the store was opened.
    #[error("Collection: {0} does not exist")]
    CollectionDoesNotExist(String),

    /// A record handed to `save` has no `uuid` key.
    #[error("Entity dictionary must have a uuid key")]
    MissingIdentifier,

    /// A stored record could not be turned back into an entity.
    #[error(transparent)]
    Representation(#[from] RepresentationError),

    /// A stored record violates an entity invariant.
    #[error("Invalid entity: {0}")]
    Model(#[from] ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A previous holder of the file lock panicked.
    #[error("Database lock poisoned")]
    LockPoisoned,
}

/// A record that does not have the shape of the entity it was read as.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Received invalid representation of {entity}: {reason}")]
pub struct RepresentationError {
    pub entity: &'static str,
    pub reason: String,
    pub record: Record,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
