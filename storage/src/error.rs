//! Storage error types.
//!
//! [`StorageError`] is returned by the repository; [`CodecError`] by message (de)serialization.

use thiserror::Error;

use crate::schema::SchemaGeneration;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("Unknown schema generation: {0}")]
    UnknownGeneration(String),

    #[error("Operation needs the {expected} schema but the store uses {actual}")]
    GenerationMismatch {
        expected: SchemaGeneration,
        actual: SchemaGeneration,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Errors raised while turning stored payloads into messages and back.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Unsupported adapter: {0}")]
    UnknownAdapter(String),

    #[error("Invalid message payload: {0}")]
    Payload(#[from] serde_json::Error),
}
