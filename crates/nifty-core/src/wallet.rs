//! Accounts and signing for the marketplace client.
//!
//! An [`Address`] is a base58-encoded Ed25519 public key. Workflows never
//! read ambient session state; they receive a [`Signer`] explicitly, which
//! in tests can be any fake and in the CLI is a local [`Keypair`].

use std::fmt;
use std::path::Path;

use ed25519_dalek::{Signer as _, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// An account address (base58-encoded Ed25519 public key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Create an address from a base58-encoded string.
    ///
    /// # Errors
    ///
    /// Returns error if the string is not valid base58 or not 32 bytes.
    pub fn from_base58(s: &str) -> Result<Self> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| CoreError::invalid_address(format!("invalid base58: {e}")))?;
        if bytes.len() != 32 {
            return Err(CoreError::invalid_address(format!(
                "address must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Create an address from a raw 32-byte public key.
    ///
    /// # Errors
    ///
    /// Returns error if `bytes` is not 32 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(CoreError::invalid_address(format!(
                "address must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(bs58::encode(bytes).into_string()))
    }

    /// Get the base58-encoded address string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the address back into an Ed25519 verifying key.
    ///
    /// # Errors
    ///
    /// Returns error if the encoded bytes are not a valid public key.
    pub fn verifying_key(&self) -> Result<VerifyingKey> {
        let bytes = bs58::decode(&self.0)
            .into_vec()
            .map_err(|e| CoreError::invalid_address(format!("invalid base58: {e}")))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CoreError::invalid_address("address must be 32 bytes"))?;
        VerifyingKey::from_bytes(&arr)
            .map_err(|e| CoreError::invalid_address(format!("not a public key: {e}")))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A signing capability scoped to one account.
///
/// Contract writes require a signature from the submitting account. The
/// trait is the seam where a wallet provider plugs in; implementations may
/// decline (the user refused to sign, the session was switched), which
/// callers surface as a rejected transaction.
pub trait Signer: Send + Sync {
    /// The account this signer signs for.
    fn address(&self) -> &Address;

    /// Sign a message, or decline with [`CoreError::SignatureRejected`].
    ///
    /// # Errors
    ///
    /// Returns error if the signer declines to produce a signature.
    fn sign(&self, message: &[u8]) -> Result<[u8; 64]>;
}

/// A local Ed25519 keypair.
///
/// Serves as the development signer for the CLI and tests. Real wallet
/// providers implement [`Signer`] over their own session handling.
pub struct Keypair {
    signing_key: SigningKey,
    address: Address,
}

impl Keypair {
    /// Generate a new random keypair.
    ///
    /// Key material comes from `OsRng` so it is drawn directly from the
    /// operating system CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns error if the derived public key cannot be encoded.
    pub fn generate() -> Result<Self> {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        Self::from_seed(&seed)
    }

    /// Create a keypair from a 32-byte secret seed.
    ///
    /// # Errors
    ///
    /// Returns error if `seed` is not 32 bytes.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let seed: [u8; 32] = seed
            .try_into()
            .map_err(|_| CoreError::key(format!("seed must be 32 bytes, got {}", seed.len())))?;
        let signing_key = SigningKey::from_bytes(&seed);
        let address = Address::from_bytes(signing_key.verifying_key().as_bytes())?;
        Ok(Self {
            signing_key,
            address,
        })
    }

    /// Load a keypair from a JSON file containing the 32 seed bytes.
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing or malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let bytes: Vec<u8> = serde_json::from_str(&contents)?;
        Self::from_seed(&bytes)
    }

    /// Save the keypair seed to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes: Vec<u8> = self.signing_key.to_bytes().to_vec();
        let json = serde_json::to_string(&bytes)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// The account address for this keypair.
    #[must_use]
    pub fn address(&self) -> &Address {
        &self.address
    }
}

impl Signer for Keypair {
    fn address(&self) -> &Address {
        &self.address
    }

    fn sign(&self, message: &[u8]) -> Result<[u8; 64]> {
        Ok(self.signing_key.sign(message).to_bytes())
    }
}

#[allow(clippy::missing_fields_in_debug)]
impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address)
            .field("seed", &"[REDACTED]")
            .finish()
    }
}
