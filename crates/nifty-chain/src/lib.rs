//! # nifty-chain
//!
//! Typed client facade over the marketplace contract.
//!
//! The contract itself is a black box: this crate translates domain calls
//! (mint, purchase, enumerate, read listing state) into signed submissions
//! and surfaces contract failures as typed errors. Reads are idempotent;
//! writes are not — re-submitting a mint creates a second token, never a
//! merge, so nothing here retries a write.
//!
//! Once a write is submitted there is no mid-flight abort: the client waits
//! for a terminal outcome (confirmed, reverted, or past the confirmation
//! horizon) before returning.
//!
//! [`SimulatedChain`] is the in-process backend used by the CLI and tests;
//! a JSON-RPC backend would implement the same [`MarketplaceContract`]
//! trait.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod contract;
pub mod error;
pub mod sim;
pub mod transaction;

pub use contract::MarketplaceContract;
pub use error::{ChainError, Result};
pub use sim::{ChainSnapshot, SimulatedChain};
pub use transaction::{Transaction, TxId, TxKind, TxStatus};
