//! The marketplace contract surface consumed by workflows.

use nifty_core::{Address, Amount, ListingRecord, Signer, TokenId};

use crate::error::Result;

/// Typed facade over the on-chain marketplace contract.
///
/// Writes (`mint`, `purchase`) are signed by the submitting account and are
/// not idempotent; reads are idempotent and may be retried freely by the
/// caller.
#[allow(async_fn_in_trait)]
pub trait MarketplaceContract {
    /// Mint a token pointing at `metadata_uri`, listed at `price`.
    ///
    /// Minting lists the token implicitly: on success a fresh
    /// [`ListingRecord`] exists with the minter as seller and owner.
    ///
    /// # Errors
    ///
    /// `Rejected` when signing is declined or the session is invalid,
    /// `Reverted` on contract-level rejection (e.g. zero price), `Timeout`
    /// past the confirmation horizon.
    async fn mint(&self, metadata_uri: &str, price: Amount, from: &dyn Signer)
        -> Result<TokenId>;

    /// Purchase a listed token, attaching `payment` in chain units.
    ///
    /// # Errors
    ///
    /// The `mint` failure kinds, plus `UnknownToken` for a token that was
    /// never minted and `InsufficientPayment` when `payment` is below the
    /// asking price at call time (detected by the contract, not here).
    async fn purchase(&self, token_id: TokenId, payment: Amount, from: &dyn Signer)
        -> Result<()>;

    /// Read the metadata pointer for a token.
    ///
    /// # Errors
    ///
    /// `UnknownToken` if the token was never minted.
    async fn metadata_uri(&self, token_id: TokenId) -> Result<String>;

    /// Read the listing state for a token.
    ///
    /// # Errors
    ///
    /// `UnknownToken` if the token was never minted.
    async fn listing(&self, token_id: TokenId) -> Result<ListingRecord>;

    /// Enumerate tokens currently owned by `account`, in mint order.
    ///
    /// An account that owns nothing gets an empty vec, not an error.
    ///
    /// # Errors
    ///
    /// Returns error only on transport-level failure.
    async fn owned_tokens(&self, account: &Address) -> Result<Vec<TokenId>>;
}
