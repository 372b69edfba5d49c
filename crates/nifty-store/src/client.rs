//! Store client trait and the simulated in-memory backend.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cid::ContentId;
use crate::error::{Result, StoreError};

/// Client operations against a content-addressed blob store.
///
/// No operation retries internally; transport failures surface as
/// [`StoreError::Unavailable`] and the caller decides retry policy.
#[allow(async_fn_in_trait)]
pub trait ContentStore {
    /// Upload raw bytes, returning their content id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on transport failure.
    async fn upload(&self, bytes: &[u8]) -> Result<ContentId>;

    /// Fetch the bytes for a content id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the store has no content for
    /// the id, [`StoreError::Unavailable`] on transport failure.
    async fn fetch(&self, id: &ContentId) -> Result<Vec<u8>>;

    /// Serialize a value to canonical JSON and upload it.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the upload fails.
    async fn upload_json<T: Serialize + Sync>(&self, value: &T) -> Result<ContentId> {
        let bytes = serde_json::to_vec(value)?;
        self.upload(&bytes).await
    }

    /// Fetch and deserialize a JSON value.
    ///
    /// # Errors
    ///
    /// Returns error if the fetch fails or the content is not valid JSON
    /// for `T`.
    async fn fetch_json<T: DeserializeOwned>(&self, id: &ContentId) -> Result<T> {
        let bytes = self.fetch(id).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Simulated store state.
#[derive(Debug, Default)]
struct MemoryState {
    blobs: HashMap<String, Vec<u8>>,
    offline: bool,
    suppressed_fetches: u32,
}

/// In-memory content-addressed store.
///
/// Simulated backend for development and tests, with switches for the
/// failure modes a remote store exhibits: going offline entirely, and the
/// eventually-consistent window where freshly uploaded content is not yet
/// fetchable.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the store being unreachable.
    ///
    /// While offline, every operation fails with
    /// [`StoreError::Unavailable`].
    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.offline = offline;
    }

    /// Make the next `n` fetches miss with [`StoreError::NotFound`].
    ///
    /// Models the eventual-consistency window after an upload; the content
    /// is still there and later fetches succeed.
    pub async fn suppress_next_fetches(&self, n: u32) {
        self.state.lock().await.suppressed_fetches = n;
    }

    /// Export all blobs for persistence.
    pub async fn snapshot(&self) -> HashMap<String, Vec<u8>> {
        self.state.lock().await.blobs.clone()
    }

    /// Replace the store contents from a snapshot.
    pub async fn restore(&self, blobs: HashMap<String, Vec<u8>>) {
        self.state.lock().await.blobs = blobs;
    }

    /// Number of distinct blobs held.
    pub async fn len(&self) -> usize {
        self.state.lock().await.blobs.len()
    }

    /// Whether the store holds no blobs.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl ContentStore for MemoryStore {
    async fn upload(&self, bytes: &[u8]) -> Result<ContentId> {
        let mut state = self.state.lock().await;
        if state.offline {
            return Err(StoreError::unavailable("store is offline"));
        }

        let id = ContentId::from_bytes(bytes);
        // Content addressing deduplicates identical bytes by construction.
        state.blobs.insert(id.as_str().to_string(), bytes.to_vec());

        debug!(id = %id, size = bytes.len(), "uploaded blob");
        Ok(id)
    }

    async fn fetch(&self, id: &ContentId) -> Result<Vec<u8>> {
        let mut state = self.state.lock().await;
        if state.offline {
            return Err(StoreError::unavailable("store is offline"));
        }
        if state.suppressed_fetches > 0 {
            state.suppressed_fetches -= 1;
            return Err(StoreError::not_found(id.as_str()));
        }

        state
            .blobs
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::not_found(id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        title: String,
        pages: u32,
    }

    #[tokio::test]
    async fn upload_then_fetch_returns_bytes() {
        let store = MemoryStore::new();
        let id = store.upload(b"artwork bytes").await.expect("should upload");
        let bytes = store.fetch(&id).await.expect("should fetch");
        assert_eq!(bytes, b"artwork bytes");
    }

    #[tokio::test]
    async fn identical_uploads_deduplicate() {
        let store = MemoryStore::new();
        let a = store.upload(b"same").await.expect("should upload");
        let b = store.upload(b"same").await.expect("should upload");
        assert_eq!(a, b);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn fetch_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        let id = ContentId::from_bytes(b"never uploaded");
        let result = store.fetch(&id).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn offline_store_is_unavailable() {
        let store = MemoryStore::new();
        let id = store.upload(b"blob").await.expect("should upload");

        store.set_offline(true).await;
        assert!(matches!(
            store.upload(b"more").await,
            Err(StoreError::Unavailable { .. })
        ));
        assert!(matches!(
            store.fetch(&id).await,
            Err(StoreError::Unavailable { .. })
        ));

        store.set_offline(false).await;
        assert!(store.fetch(&id).await.is_ok());
    }

    #[tokio::test]
    async fn suppressed_fetch_misses_then_recovers() {
        let store = MemoryStore::new();
        let id = store.upload(b"fresh").await.expect("should upload");

        store.suppress_next_fetches(1).await;
        assert!(matches!(
            store.fetch(&id).await,
            Err(StoreError::NotFound { .. })
        ));

        // The miss was transient; a retry succeeds.
        let bytes = store.fetch(&id).await.expect("should fetch on retry");
        assert_eq!(bytes, b"fresh");
    }

    #[tokio::test]
    async fn json_round_trips() {
        let store = MemoryStore::new();
        let doc = Doc {
            title: "catalog".to_string(),
            pages: 12,
        };
        let id = store.upload_json(&doc).await.expect("should upload");
        let parsed: Doc = store.fetch_json(&id).await.expect("should fetch");
        assert_eq!(doc, parsed);
    }

    #[tokio::test]
    async fn json_upload_is_deterministic() {
        let store = MemoryStore::new();
        let doc = Doc {
            title: "catalog".to_string(),
            pages: 12,
        };
        let a = store.upload_json(&doc).await.expect("should upload");
        let b = store.upload_json(&doc).await.expect("should upload");
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn fetch_json_rejects_malformed_content() {
        let store = MemoryStore::new();
        let id = store.upload(b"not json").await.expect("should upload");
        let result: Result<Doc> = store.fetch_json(&id).await;
        assert!(matches!(result, Err(StoreError::Json(_))));
    }
}
