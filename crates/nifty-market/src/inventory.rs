//! Inventory workflow: chain state plus store metadata, merged per token.

use futures::future::join_all;
use nifty_chain::MarketplaceContract;
use nifty_core::{Address, DisplayNft, Metadata, TokenId};
use nifty_store::{ContentId, ContentStore};
use tracing::{debug, warn};

use crate::error::{MarketError, Result};

/// A per-item resolution failure.
///
/// One corrupt record must not make the whole collection unviewable, so
/// failures are collected next to the items that did resolve.
#[derive(Debug)]
pub struct ItemFailure {
    /// The token whose resolution failed.
    pub token_id: TokenId,

    /// What went wrong for this item.
    pub error: MarketError,
}

/// The result of one inventory load.
#[derive(Debug, Default)]
pub struct InventoryReport {
    /// Display-ready records, in the chain's enumeration order.
    pub nfts: Vec<DisplayNft>,

    /// Items that failed to resolve.
    pub failures: Vec<ItemFailure>,
}

impl InventoryReport {
    /// Whether every enumerated item resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Builds the display-ready collection for an account.
///
/// Each load re-enumerates from the chain; nothing is cached between
/// calls. Per-item metadata resolution fans out concurrently and one
/// item's failure never blocks or cancels its siblings.
pub struct InventoryWorkflow<'a, S, C> {
    store: &'a S,
    contract: &'a C,
}

impl<'a, S: ContentStore, C: MarketplaceContract> InventoryWorkflow<'a, S, C> {
    /// Create a workflow over the given store and contract.
    pub fn new(store: &'a S, contract: &'a C) -> Self {
        Self { store, contract }
    }

    /// Load the collection for `account`.
    ///
    /// # Errors
    ///
    /// Returns error only when the enumeration itself fails; item-level
    /// failures are reported inside the [`InventoryReport`].
    pub async fn load(&self, account: &Address) -> Result<InventoryReport> {
        let token_ids = self.contract.owned_tokens(account).await?;
        debug!(account = %account, count = token_ids.len(), "loading inventory");

        let resolutions = join_all(token_ids.iter().map(|&id| self.resolve_item(id))).await;

        let mut report = InventoryReport::default();
        for (token_id, resolution) in token_ids.into_iter().zip(resolutions) {
            match resolution {
                Ok(nft) => report.nfts.push(nft),
                Err(error) => {
                    warn!(token_id = %token_id, error = %error, "inventory item failed");
                    report.failures.push(ItemFailure { token_id, error });
                }
            }
        }
        Ok(report)
    }

    /// Resolve one token: metadata pointer → metadata → merge with listing.
    async fn resolve_item(&self, token_id: TokenId) -> Result<DisplayNft> {
        let token_uri = self.contract.metadata_uri(token_id).await?;
        let content_id = ContentId::from_uri(&token_uri)?;
        let metadata: Metadata = self.store.fetch_json(&content_id).await?;
        let listing = self.contract.listing(token_id).await?;

        Ok(DisplayNft {
            token_id,
            name: metadata.name,
            description: metadata.description,
            image: metadata.image,
            price: listing.price,
            seller: listing.seller,
            owner: listing.owner,
            token_uri,
        })
    }
}
