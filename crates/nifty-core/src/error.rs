//! Error types for marketplace primitives.

use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in marketplace primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A decimal amount string could not be converted to chain units.
    #[error("invalid amount: {message}")]
    InvalidAmount {
        /// Description of the amount error.
        message: String,
    },

    /// Invalid account address format.
    #[error("invalid address: {message}")]
    InvalidAddress {
        /// Description of the address error.
        message: String,
    },

    /// The signer declined to produce a signature.
    #[error("signature rejected: {reason}")]
    SignatureRejected {
        /// Why signing was declined.
        reason: String,
    },

    /// Keypair error (generation, parsing, storage).
    #[error("key error: {message}")]
    Key {
        /// Description of the key error.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Create an invalid amount error.
    #[must_use]
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount {
            message: message.into(),
        }
    }

    /// Create an invalid address error.
    #[must_use]
    pub fn invalid_address(message: impl Into<String>) -> Self {
        Self::InvalidAddress {
            message: message.into(),
        }
    }

    /// Create a signature rejected error.
    #[must_use]
    pub fn signature_rejected(reason: impl Into<String>) -> Self {
        Self::SignatureRejected {
            reason: reason.into(),
        }
    }

    /// Create a key error.
    #[must_use]
    pub fn key(message: impl Into<String>) -> Self {
        Self::Key {
            message: message.into(),
        }
    }
}
