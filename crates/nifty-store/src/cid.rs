//! Content identifiers and gateway URI resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Prefix marking a blake3-derived content id.
const CID_PREFIX: &str = "b3";

/// Default public gateway for resolving content ids.
pub const DEFAULT_GATEWAY: &str = "https://gateway.niftylabs.dev/content/";

/// A content identifier, derived from the content's bytes.
///
/// The id is the blake3 hash of the content, base58-encoded with a `b3`
/// prefix. Same bytes, same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentId(String);

impl ContentId {
    /// Derive the content id for a byte slice.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let hash = blake3::hash(bytes);
        Self(format!(
            "{CID_PREFIX}{}",
            bs58::encode(hash.as_bytes()).into_string()
        ))
    }

    /// Parse a content id string.
    ///
    /// # Errors
    ///
    /// Returns error if the prefix is missing or the digest is not a
    /// base58-encoded 32-byte value.
    pub fn parse(s: &str) -> Result<Self> {
        let digest = s
            .strip_prefix(CID_PREFIX)
            .ok_or_else(|| StoreError::invalid_id(format!("missing {CID_PREFIX} prefix: {s:?}")))?;
        let bytes = bs58::decode(digest)
            .into_vec()
            .map_err(|e| StoreError::invalid_id(format!("invalid base58: {e}")))?;
        if bytes.len() != 32 {
            return Err(StoreError::invalid_id(format!(
                "digest must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Extract the content id from a gateway URI.
    ///
    /// Works for any gateway: the id is the final path segment.
    ///
    /// # Errors
    ///
    /// Returns error if the final segment is not a valid content id.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let segment = uri
            .rsplit('/')
            .next()
            .ok_or_else(|| StoreError::invalid_id(format!("empty URI: {uri:?}")))?;
        Self::parse(segment)
    }

    /// Get the id as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A content gateway that maps ids to fetchable URIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gateway {
    base_url: String,
}

impl Gateway {
    /// Create a gateway with the given base URL.
    ///
    /// A trailing slash is appended when missing.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    /// Resolve a content id to a fetchable URI.
    ///
    /// Pure string construction; no network call.
    #[must_use]
    pub fn resolve(&self, id: &ContentId) -> String {
        format!("{}{}", self.base_url, id)
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bytes_same_id() {
        let a = ContentId::from_bytes(b"pixels");
        let b = ContentId::from_bytes(b"pixels");
        assert_eq!(a, b);
    }

    #[test]
    fn different_bytes_different_id() {
        let a = ContentId::from_bytes(b"pixels");
        let b = ContentId::from_bytes(b"other pixels");
        assert_ne!(a, b);
    }

    #[test]
    fn id_round_trips_through_parse() {
        let id = ContentId::from_bytes(b"content");
        let parsed = ContentId::parse(id.as_str()).expect("should parse");
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        assert!(ContentId::parse("QmSomethingElse").is_err());
    }

    #[test]
    fn parse_rejects_short_digest() {
        assert!(ContentId::parse("b3abc").is_err());
    }

    #[test]
    fn resolve_then_from_uri_round_trips() {
        let id = ContentId::from_bytes(b"artwork");
        let gateway = Gateway::default();
        let uri = gateway.resolve(&id);
        assert!(uri.starts_with(DEFAULT_GATEWAY));

        let recovered = ContentId::from_uri(&uri).expect("should recover id");
        assert_eq!(id, recovered);
    }

    #[test]
    fn from_uri_rejects_dangling_pointer() {
        let result = ContentId::from_uri("https://gateway.niftylabs.dev/content/garbage");
        assert!(result.is_err());
    }

    #[test]
    fn gateway_appends_missing_slash() {
        let id = ContentId::from_bytes(b"x");
        let gateway = Gateway::new("https://mirror.example/ipfs");
        assert!(gateway.resolve(&id).starts_with("https://mirror.example/ipfs/"));
    }
}
