//! Error types for the student API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because a delete racing another client
//! commonly lands on an id that is already gone. All other non-2xx responses
//! land in `HttpError` with the raw status code and body for debugging.
//! `ErrorKind` folds the variants into the three classes the UI cares about.

use thiserror::Error;

/// Errors returned by `StudentClient` and `ListSynchronizer`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Input rejected before any request was sent.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body did not have the expected shape.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}

/// Coarse classification of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Remote,
    Decode,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) | ApiError::SerializationError(_) => ErrorKind::Validation,
            ApiError::NotFound | ApiError::HttpError { .. } | ApiError::Transport(_) => {
                ErrorKind::Remote
            }
            ApiError::DeserializationError(_) => ErrorKind::Decode,
        }
    }
}

/// Failure reported by a `Transport` when no HTTP response was obtained.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Transport(err.message)
    }
}
