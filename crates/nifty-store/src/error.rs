//! Error types for content store operations.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur talking to the content store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure reaching the store.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Description of the transport failure.
        message: String,
    },

    /// The store returned no content for an id.
    #[error("content not found: {id}")]
    NotFound {
        /// The missing content id.
        id: String,
    },

    /// A string is not a valid content id or content URI.
    #[error("invalid content id: {message}")]
    InvalidId {
        /// Description of the parse failure.
        message: String,
    },

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a not-found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create an invalid-id error.
    #[must_use]
    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId {
            message: message.into(),
        }
    }
}
