//! Token records: on-chain listings, off-chain metadata, and the merged
//! client-side view.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::wallet::Address;

/// Identifier of a minted token, assigned by the contract at mint time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct TokenId(u64);

impl TokenId {
    /// Wrap a raw token number.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw token number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Off-chain token metadata, stored immutably in the content store.
///
/// Created once at mint time and never edited; a new mint produces a new
/// metadata record. The `image` field holds the content URI of the uploaded
/// image bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Token name.
    pub name: String,

    /// Token description.
    pub description: String,

    /// Content URI of the token image.
    pub image: String,

    /// Account that minted the token.
    pub owner: Address,
}

/// On-chain listing state for one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// The listed token.
    pub token_id: TokenId,

    /// Account that minted and listed the token.
    pub seller: Address,

    /// Asking price in chain units.
    pub price: Amount,

    /// Current owner; updated on successful purchase.
    pub owner: Address,
}

/// Display-ready NFT record, merged from chain state and store metadata.
///
/// Recomputed on every inventory load; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayNft {
    /// The token.
    pub token_id: TokenId,

    /// Name from metadata.
    pub name: String,

    /// Description from metadata.
    pub description: String,

    /// Image URI from metadata.
    pub image: String,

    /// Asking price from the listing.
    pub price: Amount,

    /// Seller from the listing.
    pub seller: Address,

    /// Current owner from the listing.
    pub owner: Address,

    /// The resolved metadata URI the record was loaded from.
    pub token_uri: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::Keypair;

    fn test_address() -> Address {
        Keypair::generate().expect("should generate").address().clone()
    }

    #[test]
    fn token_id_value_round_trips() {
        let id = TokenId::new(7);
        assert_eq!(id.value(), 7);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn metadata_serializes_with_stable_field_order() {
        let meta = Metadata {
            name: "Abstraction #1".to_string(),
            description: "generative art".to_string(),
            image: "https://gateway.example/content/b3abc".to_string(),
            owner: test_address(),
        };
        let json = serde_json::to_string(&meta).expect("serialize");

        let name_pos = json.find("\"name\"").expect("name field");
        let desc_pos = json.find("\"description\"").expect("description field");
        let image_pos = json.find("\"image\"").expect("image field");
        let owner_pos = json.find("\"owner\"").expect("owner field");
        assert!(name_pos < desc_pos && desc_pos < image_pos && image_pos < owner_pos);

        let parsed: Metadata = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(meta, parsed);
    }

    #[test]
    fn listing_price_serializes_as_decimal_string() {
        let owner = test_address();
        let listing = ListingRecord {
            token_id: TokenId::new(1),
            seller: owner.clone(),
            price: "2.5".parse().expect("should parse"),
            owner,
        };
        let json = serde_json::to_string(&listing).expect("serialize");
        assert!(json.contains("\"2.5\""));
    }
}
