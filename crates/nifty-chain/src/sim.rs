//! Simulated marketplace chain.
//!
//! In-process backend implementing [`MarketplaceContract`] against in-memory
//! state. Signatures are verified for real (Ed25519 against the submitting
//! address), confirmation waits honor the configured horizon, and failure
//! injection switches let tests drive every terminal outcome a live chain
//! can produce.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use ed25519_dalek::Signature;
use nifty_core::{Address, Amount, ListingRecord, Signer, TokenId};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::contract::MarketplaceContract;
use crate::error::{ChainError, Result};
use crate::transaction::{Transaction, TxKind};

/// Default confirmation wait horizon.
const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Pending failure injections, consumed by the next write.
#[derive(Debug, Default)]
struct Injections {
    reject_next: Option<String>,
    revert_next: Option<String>,
    delay_next: Option<Duration>,
}

/// Simulated chain state.
#[derive(Debug, Default)]
struct ChainState {
    next_token_id: u64,
    listings: HashMap<u64, ListingRecord>,
    token_uris: HashMap<u64, String>,
    mint_order: Vec<TokenId>,
    transactions: Vec<Transaction>,
    revoked: HashSet<String>,
    inject: Injections,
}

/// Portable snapshot of the simulated chain, for persistence across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Last assigned token number.
    pub next_token_id: u64,
    /// Listings by token number.
    pub listings: HashMap<u64, ListingRecord>,
    /// Metadata pointers by token number.
    pub token_uris: HashMap<u64, String>,
    /// Token ids in mint order.
    pub mint_order: Vec<TokenId>,
    /// Transaction log.
    pub transactions: Vec<Transaction>,
}

/// In-memory marketplace chain.
pub struct SimulatedChain {
    confirmation_timeout: Duration,
    state: Arc<Mutex<ChainState>>,
}

impl SimulatedChain {
    /// Create an empty chain with the default confirmation horizon.
    #[must_use]
    pub fn new() -> Self {
        Self {
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            state: Arc::new(Mutex::new(ChainState::default())),
        }
    }

    /// Set the confirmation wait horizon.
    #[must_use]
    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    /// Reject the next write before submission (as a wallet decline would).
    pub async fn inject_reject(&self, reason: impl Into<String>) {
        self.state.lock().await.inject.reject_next = Some(reason.into());
    }

    /// Revert the next write at the contract level.
    pub async fn inject_revert(&self, reason: impl Into<String>) {
        self.state.lock().await.inject.revert_next = Some(reason.into());
    }

    /// Delay the next write's confirmation by `delay`.
    ///
    /// A delay beyond the confirmation horizon drives a timeout.
    pub async fn inject_delay(&self, delay: Duration) {
        self.state.lock().await.inject.delay_next = Some(delay);
    }

    /// Invalidate the session for `account`.
    ///
    /// Every in-flight or subsequent write signed by the account fails with
    /// a rejection instead of completing under the stale session.
    pub async fn invalidate_session(&self, account: &Address) {
        self.state
            .lock()
            .await
            .revoked
            .insert(account.as_str().to_string());
        info!(account = %account, "session invalidated");
    }

    /// Number of write transactions recorded (any status).
    pub async fn transaction_count(&self) -> usize {
        self.state.lock().await.transactions.len()
    }

    /// Copy of the transaction log.
    pub async fn transactions(&self) -> Vec<Transaction> {
        self.state.lock().await.transactions.clone()
    }

    /// Export the chain state for persistence.
    pub async fn snapshot(&self) -> ChainSnapshot {
        let state = self.state.lock().await;
        ChainSnapshot {
            next_token_id: state.next_token_id,
            listings: state.listings.clone(),
            token_uris: state.token_uris.clone(),
            mint_order: state.mint_order.clone(),
            transactions: state.transactions.clone(),
        }
    }

    /// Replace the chain state from a snapshot.
    pub async fn restore(&self, snapshot: ChainSnapshot) {
        let mut state = self.state.lock().await;
        state.next_token_id = snapshot.next_token_id;
        state.listings = snapshot.listings;
        state.token_uris = snapshot.token_uris;
        state.mint_order = snapshot.mint_order;
        state.transactions = snapshot.transactions;
    }

    /// Sign and verify a write payload, record the submitted transaction,
    /// and return the pending delay plus the transaction's log index.
    async fn begin_write(
        &self,
        kind: TxKind,
        value: Amount,
        payload: &str,
        from: &dyn Signer,
    ) -> Result<(Option<Duration>, usize)> {
        // Signing happens before anything reaches the chain; a decline
        // means nothing was submitted.
        let signature = from
            .sign(payload.as_bytes())
            .map_err(|e| ChainError::rejected(e.to_string()))?;

        let mut state = self.state.lock().await;

        if state.revoked.contains(from.address().as_str()) {
            return Err(ChainError::rejected(format!(
                "session invalidated for {}",
                from.address()
            )));
        }

        let key = from
            .address()
            .verifying_key()
            .map_err(|e| ChainError::rejected(e.to_string()))?;
        if key
            .verify_strict(payload.as_bytes(), &Signature::from_bytes(&signature))
            .is_err()
        {
            return Err(ChainError::rejected(format!(
                "invalid signature for {}",
                from.address()
            )));
        }

        if let Some(reason) = state.inject.reject_next.take() {
            return Err(ChainError::rejected(reason));
        }

        let mut tx = Transaction::new(kind, from.address().clone(), value);
        tx.mark_submitted(bs58_signature(&signature));

        if let Some(reason) = state.inject.revert_next.take() {
            tx.mark_reverted(reason.clone());
            state.transactions.push(tx);
            return Err(ChainError::reverted(reason));
        }

        let delay = state.inject.delay_next.take();
        state.transactions.push(tx);
        let index = state.transactions.len() - 1;

        debug!(kind = %kind, from = %from.address(), "write submitted");
        Ok((delay, index))
    }

    /// Wait out a simulated confirmation delay within the horizon.
    async fn await_confirmation(
        &self,
        operation: &str,
        delay: Option<Duration>,
        tx_index: usize,
    ) -> Result<()> {
        let Some(delay) = delay else { return Ok(()) };

        if tokio::time::timeout(self.confirmation_timeout, tokio::time::sleep(delay))
            .await
            .is_err()
        {
            let mut state = self.state.lock().await;
            if let Some(tx) = state.transactions.get_mut(tx_index) {
                tx.mark_timed_out();
            }
            return Err(ChainError::timeout(
                operation,
                self.confirmation_timeout.as_secs(),
            ));
        }
        Ok(())
    }

    /// Fail a submitted transaction after the fact.
    async fn fail_tx(&self, tx_index: usize, reason: &str) {
        let mut state = self.state.lock().await;
        if let Some(tx) = state.transactions.get_mut(tx_index) {
            tx.mark_reverted(reason.to_string());
        }
    }
}

impl Default for SimulatedChain {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketplaceContract for SimulatedChain {
    async fn mint(
        &self,
        metadata_uri: &str,
        price: Amount,
        from: &dyn Signer,
    ) -> Result<TokenId> {
        // Contract-level validation, surfaced as a revert.
        if price.is_zero() {
            return Err(ChainError::reverted("price must be greater than zero"));
        }

        let payload = format!("mint|{metadata_uri}|{}", price.as_wei());
        let (delay, tx_index) = self
            .begin_write(TxKind::Mint, price, &payload, from)
            .await?;

        self.await_confirmation("mint", delay, tx_index).await?;

        let mut state = self.state.lock().await;
        if state.revoked.contains(from.address().as_str()) {
            drop(state);
            self.fail_tx(tx_index, "session invalidated").await;
            return Err(ChainError::rejected(format!(
                "session invalidated for {}",
                from.address()
            )));
        }

        state.next_token_id += 1;
        let token_id = TokenId::new(state.next_token_id);
        let listing = ListingRecord {
            token_id,
            seller: from.address().clone(),
            price,
            owner: from.address().clone(),
        };
        state.listings.insert(token_id.value(), listing);
        state
            .token_uris
            .insert(token_id.value(), metadata_uri.to_string());
        state.mint_order.push(token_id);
        if let Some(tx) = state.transactions.get_mut(tx_index) {
            tx.mark_confirmed(token_id);
        }

        info!(token_id = %token_id, price = %price, seller = %from.address(), "token minted");
        Ok(token_id)
    }

    async fn purchase(
        &self,
        token_id: TokenId,
        payment: Amount,
        from: &dyn Signer,
    ) -> Result<()> {
        // Contract-side checks against the live listing.
        {
            let state = self.state.lock().await;
            let listing = state
                .listings
                .get(&token_id.value())
                .ok_or(ChainError::UnknownToken { token_id })?;
            if listing.owner == *from.address() {
                return Err(ChainError::reverted(format!(
                    "buyer already owns token {token_id}"
                )));
            }
            if payment < listing.price {
                return Err(ChainError::InsufficientPayment {
                    offered: payment,
                    asking: listing.price,
                });
            }
        }

        let payload = format!("purchase|{token_id}|{}", payment.as_wei());
        let (delay, tx_index) = self
            .begin_write(TxKind::Purchase, payment, &payload, from)
            .await?;

        self.await_confirmation("purchase", delay, tx_index).await?;

        let mut state = self.state.lock().await;
        if state.revoked.contains(from.address().as_str()) {
            drop(state);
            self.fail_tx(tx_index, "session invalidated").await;
            return Err(ChainError::rejected(format!(
                "session invalidated for {}",
                from.address()
            )));
        }

        let Some(listing) = state.listings.get_mut(&token_id.value()) else {
            drop(state);
            self.fail_tx(tx_index, "listing disappeared").await;
            return Err(ChainError::UnknownToken { token_id });
        };
        listing.owner = from.address().clone();
        if let Some(tx) = state.transactions.get_mut(tx_index) {
            tx.mark_confirmed(token_id);
        }

        info!(token_id = %token_id, buyer = %from.address(), payment = %payment, "token purchased");
        Ok(())
    }

    async fn metadata_uri(&self, token_id: TokenId) -> Result<String> {
        let state = self.state.lock().await;
        state
            .token_uris
            .get(&token_id.value())
            .cloned()
            .ok_or(ChainError::UnknownToken { token_id })
    }

    async fn listing(&self, token_id: TokenId) -> Result<ListingRecord> {
        let state = self.state.lock().await;
        state
            .listings
            .get(&token_id.value())
            .cloned()
            .ok_or(ChainError::UnknownToken { token_id })
    }

    async fn owned_tokens(&self, account: &Address) -> Result<Vec<TokenId>> {
        let state = self.state.lock().await;
        Ok(state
            .mint_order
            .iter()
            .filter(|id| {
                state
                    .listings
                    .get(&id.value())
                    .is_some_and(|l| l.owner == *account)
            })
            .copied()
            .collect())
    }
}

#[allow(clippy::missing_fields_in_debug)]
impl std::fmt::Debug for SimulatedChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedChain")
            .field("confirmation_timeout", &self.confirmation_timeout)
            .finish_non_exhaustive()
    }
}

/// Encode a signature for the transaction log.
fn bs58_signature(signature: &[u8; 64]) -> String {
    bs58::encode(signature).into_string()
}
