//! Purchase workflow: fresh price check, then payment.

use nifty_chain::MarketplaceContract;
use nifty_core::{ListingRecord, Signer, TokenId};
use tracing::{info, warn};

use crate::error::{ErrorKind, MarketError, Result};

/// Observable purchase workflow state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseState {
    /// No purchase in progress.
    Idle,
    /// Reading the current listing before paying.
    PricingCheck,
    /// Purchase submitted, awaiting confirmation.
    Purchasing,
    /// Purchase confirmed; ownership transferred.
    Confirmed {
        /// The purchased token.
        token_id: TokenId,
    },
    /// Terminal failure with the originating error kind.
    Failed {
        /// The originating error kind.
        kind: ErrorKind,
        /// Human-readable failure description.
        message: String,
    },
}

impl PurchaseState {
    /// Check if the workflow reached a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed { .. } | Self::Failed { .. })
    }
}

/// Orchestrates a purchase at the current asking price.
///
/// The listing is read fresh immediately before paying — never from a
/// cached copy — so the payment matches the asking price at call time. A
/// token already owned by the buyer is refused client-side before any
/// transaction is submitted.
pub struct PurchaseWorkflow<'a, C> {
    contract: &'a C,
    signer: &'a dyn Signer,
    state: PurchaseState,
}

impl<'a, C: MarketplaceContract> PurchaseWorkflow<'a, C> {
    /// Create a workflow over the given contract and signer.
    pub fn new(contract: &'a C, signer: &'a dyn Signer) -> Self {
        Self {
            contract,
            signer,
            state: PurchaseState::Idle,
        }
    }

    /// Current workflow state, for the display layer.
    #[must_use]
    pub fn state(&self) -> &PurchaseState {
        &self.state
    }

    /// Purchase `token_id` at its current asking price.
    ///
    /// Returns the listing as it was paid, so the caller can redirect to
    /// the inventory view with the final numbers.
    ///
    /// # Errors
    ///
    /// `AlreadyOwned` when the buyer holds the token (no transaction is
    /// submitted); otherwise the read or purchase error, with its kind
    /// recorded in [`PurchaseState::Failed`].
    pub async fn execute(&mut self, token_id: TokenId) -> Result<ListingRecord> {
        self.state = PurchaseState::PricingCheck;
        let listing = match self.contract.listing(token_id).await {
            Ok(listing) => listing,
            Err(e) => return self.fail(e.into()),
        };

        if listing.owner == *self.signer.address() {
            return self.fail(MarketError::AlreadyOwned { token_id });
        }

        self.state = PurchaseState::Purchasing;
        if let Err(e) = self
            .contract
            .purchase(token_id, listing.price, self.signer)
            .await
        {
            return self.fail(e.into());
        }

        self.state = PurchaseState::Confirmed { token_id };
        info!(token_id = %token_id, price = %listing.price, "purchase confirmed");
        Ok(listing)
    }

    fn fail<T>(&mut self, error: MarketError) -> Result<T> {
        warn!(kind = %error.kind(), error = %error, "purchase failed");
        self.state = PurchaseState::Failed {
            kind: error.kind(),
            message: error.to_string(),
        };
        Err(error)
    }
}
