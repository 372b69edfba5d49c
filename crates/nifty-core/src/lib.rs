//! # nifty-core
//!
//! Shared primitives for the Nifty NFT marketplace client.
//!
//! This crate provides:
//! - Fixed-point [`Amount`] handling (18 decimals, integer-only arithmetic)
//! - [`Address`] and [`Keypair`] types for accounts and signing
//! - Token records: [`Metadata`], [`ListingRecord`], [`DisplayNft`]
//!
//! ## Amounts
//!
//! Prices cross the client/chain boundary as integers (wei) and are shown to
//! people as decimal strings (GEM). The conversion is exact in both
//! directions; no floating-point type appears anywhere on the path.
//!
//! ```rust
//! use nifty_core::Amount;
//!
//! let price: Amount = "1.5".parse()?;
//! assert_eq!(price.as_wei(), 1_500_000_000_000_000_000);
//! assert_eq!(price.to_decimal_string(), "1.5");
//! # Ok::<(), nifty_core::CoreError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod amount;
pub mod error;
pub mod token;
pub mod wallet;

pub use amount::Amount;
pub use error::{CoreError, Result};
pub use token::{DisplayNft, ListingRecord, Metadata, TokenId};
pub use wallet::{Address, Keypair, Signer};

/// Decimal places of the marketplace currency.
pub const GEM_DECIMALS: u32 = 18;

/// One whole GEM in base units (wei).
pub const WEI_PER_GEM: u128 = 1_000_000_000_000_000_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(GEM_DECIMALS, 18);
        assert_eq!(WEI_PER_GEM, 10u128.pow(GEM_DECIMALS));
    }
}
