//! Client error types
//!
//! These never leave the crate through [`RemoteStore`](crate::RemoteStore);
//! they exist so the HTTP layer can use `?` internally and log one precise
//! reason before degrading the call.

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Store answered with a non-success status
    #[error("store returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
