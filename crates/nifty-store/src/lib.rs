//! # nifty-store
//!
//! Client for the content-addressed blob store that backs NFT metadata and
//! images.
//!
//! The retrieval key of every blob is derived from its bytes: uploading the
//! same content twice yields the same [`ContentId`]. A [`Gateway`] turns a
//! content id into a fetchable URI without any network call.
//!
//! The store is eventually consistent: a fetch immediately after an upload
//! may transiently miss. Callers decide their own retry policy; this crate
//! performs no internal retries.
//!
//! ## Example
//!
//! ```rust
//! use nifty_store::{ContentStore, Gateway, MemoryStore};
//!
//! # async fn example() -> nifty_store::Result<()> {
//! let store = MemoryStore::new();
//! let id = store.upload(b"image bytes").await?;
//!
//! let gateway = Gateway::default();
//! let uri = gateway.resolve(&id);
//!
//! let bytes = store.fetch(&id).await?;
//! assert_eq!(bytes, b"image bytes");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cid;
pub mod client;
pub mod error;

pub use cid::{ContentId, Gateway};
pub use client::{ContentStore, MemoryStore};
pub use error::{Result, StoreError};
