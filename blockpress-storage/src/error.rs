//! Error types for the storage layer.

use crate::backend::ResponseError;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
///
/// These are failures to reach or run the backend. A backend that runs a
/// request and refuses it reports through [`Response::errors`] instead,
/// which [`Response::into_result`] turns into [`StorageError::Rejected`].
///
/// [`Response::errors`]: crate::Response::errors
/// [`Response::into_result`]: crate::Response::into_result
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend answered with errors.
    #[error("request rejected: {}", join_messages(.0))]
    Rejected(Vec<ResponseError>),

    /// The backend answered with neither data nor errors.
    #[error("empty response")]
    EmptyResponse,

    /// Stored data could not be read back.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A blocking storage task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(String),

    /// The backend could not be reached.
    #[error("transport error: {0}")]
    Transport(String),
}

fn join_messages(errors: &[ResponseError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
