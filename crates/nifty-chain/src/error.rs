//! Error types for contract operations.

use nifty_core::{Amount, TokenId};
use thiserror::Error;

/// Result type alias for chain operations.
pub type Result<T> = std::result::Result<T, ChainError>;

/// Errors that can occur submitting to or reading from the contract.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The transaction was never submitted: signing was declined or the
    /// session is no longer valid for the submitting account.
    #[error("transaction rejected: {reason}")]
    Rejected {
        /// Why the submission was rejected.
        reason: String,
    },

    /// The contract rejected the call.
    #[error("transaction reverted: {reason}")]
    Reverted {
        /// Revert reason reported by the contract.
        reason: String,
    },

    /// No terminal outcome was observed within the confirmation horizon.
    #[error("transaction timeout: {operation} unconfirmed after {horizon_secs}s")]
    Timeout {
        /// Operation that timed out.
        operation: String,
        /// Configured wait horizon.
        horizon_secs: u64,
    },

    /// The token was never minted.
    #[error("unknown token: {token_id}")]
    UnknownToken {
        /// The unknown token id.
        token_id: TokenId,
    },

    /// Payment below the asking price at call time.
    #[error("insufficient payment: offered {offered}, asking {asking}")]
    InsufficientPayment {
        /// The payment that was offered.
        offered: Amount,
        /// The asking price at call time.
        asking: Amount,
    },
}

impl ChainError {
    /// Create a rejected error.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Create a reverted error.
    #[must_use]
    pub fn reverted(reason: impl Into<String>) -> Self {
        Self::Reverted {
            reason: reason.into(),
        }
    }

    /// Create a timeout error.
    #[must_use]
    pub fn timeout(operation: impl Into<String>, horizon_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            horizon_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_token_display() {
        let err = ChainError::UnknownToken {
            token_id: TokenId::new(42),
        };
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_insufficient_payment_display() {
        let err = ChainError::InsufficientPayment {
            offered: "1".parse().expect("amount"),
            asking: "1.5".parse().expect("amount"),
        };
        let s = err.to_string();
        assert!(s.contains("1 GEM"));
        assert!(s.contains("1.5 GEM"));
    }

    #[test]
    fn test_timeout_display() {
        let err = ChainError::timeout("mint", 30);
        assert!(err.to_string().contains("mint"));
        assert!(err.to_string().contains("30"));
    }
}
