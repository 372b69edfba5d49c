//! Transaction records kept by the chain client.

use std::fmt;

use chrono::{DateTime, Utc};
use nifty_core::{Address, Amount, TokenId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique transaction identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(String);

impl TxId {
    /// Create a new random transaction id.
    #[must_use]
    pub fn new() -> Self {
        Self(format!("tx-{}", Uuid::new_v4()))
    }

    /// Get the id as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TxId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    /// Built but not yet submitted.
    Pending,
    /// Submitted, awaiting confirmation.
    Submitted,
    /// Confirmed on-chain.
    Confirmed,
    /// Rejected by the contract.
    Reverted,
    /// No terminal outcome within the confirmation horizon.
    TimedOut,
}

impl TxStatus {
    /// Check if the transaction reached a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Reverted | Self::TimedOut)
    }

    /// Check if the transaction succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Submitted => write!(f, "submitted"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Reverted => write!(f, "reverted"),
            Self::TimedOut => write!(f, "timed_out"),
        }
    }
}

/// Kind of contract write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    /// Mint a token (and list it).
    Mint,
    /// Purchase a listed token.
    Purchase,
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mint => write!(f, "mint"),
            Self::Purchase => write!(f, "purchase"),
        }
    }
}

/// A marketplace transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction id.
    pub id: TxId,

    /// Kind of write.
    pub kind: TxKind,

    /// Submitting account.
    pub from: Address,

    /// Token affected (assigned at confirmation for mints).
    pub token_id: Option<TokenId>,

    /// Value attached in chain units.
    pub value: Amount,

    /// Current status.
    pub status: TxStatus,

    /// Submission signature.
    pub signature: Option<String>,

    /// Failure description (if reverted or timed out).
    pub error: Option<String>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Build a new pending transaction.
    #[must_use]
    pub fn new(kind: TxKind, from: Address, value: Amount) -> Self {
        let now = Utc::now();
        Self {
            id: TxId::new(),
            kind,
            from,
            token_id: None,
            value,
            status: TxStatus::Pending,
            signature: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark as submitted with its signature.
    pub fn mark_submitted(&mut self, signature: String) {
        self.status = TxStatus::Submitted;
        self.signature = Some(signature);
        self.updated_at = Utc::now();
    }

    /// Mark as confirmed, recording the affected token.
    pub fn mark_confirmed(&mut self, token_id: TokenId) {
        self.status = TxStatus::Confirmed;
        self.token_id = Some(token_id);
        self.updated_at = Utc::now();
    }

    /// Mark as reverted.
    pub fn mark_reverted(&mut self, reason: String) {
        self.status = TxStatus::Reverted;
        self.error = Some(reason);
        self.updated_at = Utc::now();
    }

    /// Mark as timed out.
    pub fn mark_timed_out(&mut self) {
        self.status = TxStatus::TimedOut;
        self.error = Some("confirmation horizon exceeded".to_string());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nifty_core::Keypair;

    fn test_address() -> Address {
        Keypair::generate().expect("should generate").address().clone()
    }

    #[test]
    fn tx_ids_are_unique() {
        assert_ne!(TxId::new(), TxId::new());
    }

    #[test]
    fn terminal_states() {
        assert!(!TxStatus::Pending.is_terminal());
        assert!(!TxStatus::Submitted.is_terminal());
        assert!(TxStatus::Confirmed.is_terminal());
        assert!(TxStatus::Reverted.is_terminal());
        assert!(TxStatus::TimedOut.is_terminal());
    }

    #[test]
    fn only_confirmed_is_success() {
        assert!(TxStatus::Confirmed.is_success());
        assert!(!TxStatus::Reverted.is_success());
        assert!(!TxStatus::TimedOut.is_success());
    }

    #[test]
    fn lifecycle_transitions() {
        let mut tx = Transaction::new(TxKind::Mint, test_address(), "1".parse().expect("amount"));
        assert_eq!(tx.status, TxStatus::Pending);

        tx.mark_submitted("sig123".to_string());
        assert_eq!(tx.status, TxStatus::Submitted);
        assert_eq!(tx.signature.as_deref(), Some("sig123"));

        tx.mark_confirmed(TokenId::new(1));
        assert_eq!(tx.status, TxStatus::Confirmed);
        assert_eq!(tx.token_id, Some(TokenId::new(1)));
    }

    #[test]
    fn revert_records_reason() {
        let mut tx =
            Transaction::new(TxKind::Purchase, test_address(), "2".parse().expect("amount"));
        tx.mark_reverted("price must be greater than zero".to_string());
        assert_eq!(tx.status, TxStatus::Reverted);
        assert!(tx.error.as_deref().is_some_and(|e| e.contains("price")));
    }

    #[test]
    fn serde_round_trips() {
        let tx = Transaction::new(TxKind::Mint, test_address(), "0.5".parse().expect("amount"));
        let json = serde_json::to_string(&tx).expect("serialize");
        let parsed: Transaction = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(tx.id, parsed.id);
        assert_eq!(tx.value, parsed.value);
    }
}
