//! # nifty-market
//!
//! The marketplace interaction layer: multi-step asynchronous workflows
//! that turn user input into on-chain tokens and reconstruct displayable
//! records from chain state plus content-addressed metadata.
//!
//! Each workflow is an explicit finite state machine with one terminal
//! success state and one terminal failure state, so the display layer
//! renders from observable state instead of timing:
//!
//! - [`MintWorkflow`] — validate → upload image → upload metadata → mint
//! - [`PurchaseWorkflow`] — fresh price check → purchase
//! - [`InventoryWorkflow`] — enumerate → fan out metadata resolution → merge
//!
//! Workflows receive their collaborators (store, contract, signer)
//! explicitly; nothing reads ambient session state. Validation failures
//! never reach the network, and network failures surface with their
//! originating kind intact — see [`ErrorKind`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod inventory;
pub mod mint;
pub mod purchase;

pub use error::{ErrorKind, MarketError, Result};
pub use inventory::{InventoryReport, InventoryWorkflow, ItemFailure};
pub use mint::{MintForm, MintState, MintWorkflow};
pub use purchase::{PurchaseState, PurchaseWorkflow};
