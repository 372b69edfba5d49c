//! Workflow error taxonomy.
//!
//! Validation errors (`IncompleteForm`, `InvalidAmount`, `AlreadyOwned`) are
//! detected client-side and never reach the network. Store and chain
//! failures pass through unchanged; nothing is downgraded to a generic
//! failure.

use std::fmt;

use nifty_chain::ChainError;
use nifty_core::TokenId;
use nifty_store::StoreError;
use thiserror::Error;

/// Result type alias for workflow operations.
pub type Result<T> = std::result::Result<T, MarketError>;

/// Errors produced by marketplace workflows.
#[derive(Debug, Error)]
pub enum MarketError {
    /// A required form field is missing or empty.
    #[error("incomplete form: missing {missing}")]
    IncompleteForm {
        /// Name of the missing field.
        missing: String,
    },

    /// A price string could not be converted to chain units.
    #[error("invalid amount: {message}")]
    InvalidAmount {
        /// Description of the amount error.
        message: String,
    },

    /// The buyer already owns the token (self-purchase guard).
    #[error("token {token_id} is already owned by this account")]
    AlreadyOwned {
        /// The token in question.
        token_id: TokenId,
    },

    /// Content store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Contract failure.
    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl MarketError {
    /// Create an incomplete-form error.
    #[must_use]
    pub fn incomplete_form(missing: impl Into<String>) -> Self {
        Self::IncompleteForm {
            missing: missing.into(),
        }
    }

    /// Create an invalid-amount error.
    #[must_use]
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount {
            message: message.into(),
        }
    }

    /// The originating error kind, preserved into terminal workflow states.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IncompleteForm { .. } => ErrorKind::IncompleteForm,
            Self::InvalidAmount { .. } => ErrorKind::InvalidAmount,
            Self::AlreadyOwned { .. } => ErrorKind::AlreadyOwned,
            Self::Store(StoreError::Unavailable { .. }) => ErrorKind::StoreUnavailable,
            // A dangling or malformed metadata pointer is a data-integrity
            // fault on the item; it surfaces as missing content.
            Self::Store(
                StoreError::NotFound { .. } | StoreError::InvalidId { .. } | StoreError::Json(_),
            ) => ErrorKind::NotFound,
            Self::Chain(ChainError::Rejected { .. }) => ErrorKind::TransactionRejected,
            Self::Chain(ChainError::Reverted { .. }) => ErrorKind::TransactionReverted,
            Self::Chain(ChainError::Timeout { .. }) => ErrorKind::TransactionTimeout,
            Self::Chain(ChainError::UnknownToken { .. }) => ErrorKind::UnknownToken,
            Self::Chain(ChainError::InsufficientPayment { .. }) => {
                ErrorKind::InsufficientPayment
            }
        }
    }
}

/// The workflow-level error taxonomy.
///
/// Carried into terminal `Failed` states so the display layer can react to
/// the kind without holding the full error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required form field is missing.
    IncompleteForm,
    /// A price string is not a valid amount.
    InvalidAmount,
    /// The content store could not be reached.
    StoreUnavailable,
    /// The store returned no (valid) content.
    NotFound,
    /// The token was never minted.
    UnknownToken,
    /// Signing was declined or the session is invalid.
    TransactionRejected,
    /// The contract rejected the call.
    TransactionReverted,
    /// No confirmation within the wait horizon.
    TransactionTimeout,
    /// Payment below the asking price.
    InsufficientPayment,
    /// Self-purchase refused client-side.
    AlreadyOwned,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::IncompleteForm => "incomplete_form",
            Self::InvalidAmount => "invalid_amount",
            Self::StoreUnavailable => "store_unavailable",
            Self::NotFound => "not_found",
            Self::UnknownToken => "unknown_token",
            Self::TransactionRejected => "transaction_rejected",
            Self::TransactionReverted => "transaction_reverted",
            Self::TransactionTimeout => "transaction_timeout",
            Self::InsufficientPayment => "insufficient_payment",
            Self::AlreadyOwned => "already_owned",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_kinds_are_preserved() {
        let err = MarketError::from(ChainError::rejected("user declined"));
        assert_eq!(err.kind(), ErrorKind::TransactionRejected);

        let err = MarketError::from(ChainError::reverted("bad price"));
        assert_eq!(err.kind(), ErrorKind::TransactionReverted);

        let err = MarketError::from(ChainError::timeout("mint", 30));
        assert_eq!(err.kind(), ErrorKind::TransactionTimeout);
    }

    #[test]
    fn store_kinds_are_preserved() {
        let err = MarketError::from(StoreError::unavailable("offline"));
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);

        let err = MarketError::from(StoreError::not_found("b3abc"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn transparent_errors_keep_their_message() {
        let err = MarketError::from(StoreError::unavailable("connection refused"));
        assert!(err.to_string().contains("connection refused"));
    }
}
