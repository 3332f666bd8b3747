//! Error type returned by the history queries.

use storage::{CodecError, SchemaGeneration, StorageError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The target has no addressing in the active schema generation. Raised before any I/O.
    #[error("Unsupported target type {platform_type} for the {generation} schema")]
    UnsupportedTarget {
        generation: SchemaGeneration,
        platform_type: &'static str,
    },

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Database(e) => Error::Database(e),
            StorageError::Codec(e) => Error::Codec(e),
            other => Error::Storage(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
