//! Mint workflow: user input to on-chain token.

use nifty_chain::MarketplaceContract;
use nifty_core::{Amount, Metadata, Signer, TokenId};
use nifty_store::{ContentId, ContentStore, Gateway};
use tracing::{debug, info, warn};

use crate::error::{ErrorKind, MarketError, Result};

/// The mint form as submitted by the user.
///
/// All four fields are required; an empty field fails validation before any
/// network call is made.
#[derive(Debug, Clone, Default)]
pub struct MintForm {
    /// Token name.
    pub name: String,

    /// Token description.
    pub description: String,

    /// Asking price as a decimal string.
    pub price: String,

    /// Raw image bytes.
    pub image: Vec<u8>,
}

impl MintForm {
    /// Check form completeness, naming the first missing field.
    fn validate(&self) -> Result<()> {
        let missing = if self.image.is_empty() {
            Some("image")
        } else if self.price.is_empty() {
            Some("price")
        } else if self.name.is_empty() {
            Some("name")
        } else if self.description.is_empty() {
            Some("description")
        } else {
            None
        };
        match missing {
            Some(field) => Err(MarketError::incomplete_form(field)),
            None => Ok(()),
        }
    }
}

/// Observable mint workflow state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintState {
    /// No submission in progress.
    Idle,
    /// Checking form completeness and price validity.
    Validating,
    /// Uploading the image bytes.
    UploadingImage,
    /// Uploading the metadata JSON referencing the image.
    UploadingMetadata,
    /// Mint submitted, awaiting confirmation.
    Minting,
    /// Mint confirmed; the token exists.
    Confirmed {
        /// The newly assigned token.
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

impl MintState {
    /// Check if the workflow reached a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed { .. } | Self::Failed { .. })
    }
}

/// Orchestrates minting: validate → upload image → upload metadata → mint.
///
/// Failure at any step moves directly to [`MintState::Failed`]; there is no
/// partial retry across steps. A resubmission restarts from validation and
/// re-runs every step, including the image upload.
pub struct MintWorkflow<'a, S, C> {
    store: &'a S,
    contract: &'a C,
    signer: &'a dyn Signer,
    gateway: Gateway,
    state: MintState,
    staged_image: Option<ContentId>,
}

impl<'a, S: ContentStore, C: MarketplaceContract> MintWorkflow<'a, S, C> {
    /// Create a workflow over the given collaborators.
    pub fn new(store: &'a S, contract: &'a C, signer: &'a dyn Signer) -> Self {
        Self {
            store,
            contract,
            signer,
            gateway: Gateway::default(),
            state: MintState::Idle,
            staged_image: None,
        }
    }

    /// Use a specific gateway for content URIs.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Gateway) -> Self {
        self.gateway = gateway;
        self
    }

    /// Current workflow state, for the display layer.
    #[must_use]
    pub fn state(&self) -> &MintState {
        &self.state
    }

    /// Upload the image eagerly, before submit.
    ///
    /// May run on file selection, independent of submission, and is
    /// idempotent per file: staging the same bytes twice performs one
    /// upload. A later [`submit`](Self::submit) with the same bytes reuses
    /// the staged upload.
    pub async fn stage_image(&mut self, bytes: &[u8]) -> Result<ContentId> {
        let expected = ContentId::from_bytes(bytes);
        if self.staged_image.as_ref() == Some(&expected) {
            debug!(id = %expected, "image already staged");
            return Ok(expected);
        }

        let id = self.store.upload(bytes).await?;
        debug!(id = %id, "image staged");
        self.staged_image = Some(id.clone());
        Ok(id)
    }

    /// Submit the form: the full validate → upload → mint sequence.
    ///
    /// On success the new token id is returned (and recorded in
    /// [`MintState::Confirmed`]) so the caller can redirect to the
    /// collection view.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error; the same kind is recorded in
    /// the terminal [`MintState::Failed`] state.
    pub async fn submit(&mut self, form: &MintForm) -> Result<TokenId> {
        self.state = MintState::Validating;

        if let Err(e) = form.validate() {
            return self.fail(e);
        }
        let price: Amount = match form.price.parse() {
            Ok(price) => price,
            Err(e) => {
                let message = match e {
                    nifty_core::CoreError::InvalidAmount { message } => message,
                    other => other.to_string(),
                };
                return self.fail(MarketError::invalid_amount(message));
            }
        };

        // The image upload is skipped only when this session already staged
        // these exact bytes.
        let expected = ContentId::from_bytes(&form.image);
        let image_id = if self.staged_image.as_ref() == Some(&expected) {
            debug!(id = %expected, "reusing staged image upload");
            expected
        } else {
            self.state = MintState::UploadingImage;
            match self.store.upload(&form.image).await {
                Ok(id) => id,
                Err(e) => return self.fail(e.into()),
            }
        };

        let metadata = Metadata {
            name: form.name.clone(),
            description: form.description.clone(),
            image: self.gateway.resolve(&image_id),
            owner: self.signer.address().clone(),
        };
        self.state = MintState::UploadingMetadata;
        let metadata_id = match self.store.upload_json(&metadata).await {
            Ok(id) => id,
            Err(e) => return self.fail(e.into()),
        };
        let token_uri = self.gateway.resolve(&metadata_id);

        self.state = MintState::Minting;
        let token_id = match self.contract.mint(&token_uri, price, self.signer).await {
            Ok(id) => id,
            Err(e) => return self.fail(e.into()),
        };

        self.state = MintState::Confirmed { token_id };
        self.staged_image = None;
        info!(token_id = %token_id, token_uri = %token_uri, price = %price, "mint confirmed");
        Ok(token_id)
    }

    /// Record a terminal failure and clear session staging, so that a
    /// resubmission restarts from the first step.
    fn fail<T>(&mut self, error: MarketError) -> Result<T> {
        warn!(kind = %error.kind(), error = %error, "mint failed");
        self.state = MintState::Failed {
            kind: error.kind(),
            message: error.to_string(),
        };
        self.staged_image = None;
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nifty_chain::SimulatedChain;
    use nifty_core::Keypair;
    use nifty_store::MemoryStore;

    fn form() -> MintForm {
        MintForm {
            name: "Abstraction #1".to_string(),
            description: "generative art".to_string(),
            price: "1.5".to_string(),
            image: b"pixels".to_vec(),
        }
    }

    #[tokio::test]
    async fn starts_idle() {
        let store = MemoryStore::new();
        let chain = SimulatedChain::new();
        let signer = Keypair::generate().expect("keypair");
        let workflow = MintWorkflow::new(&store, &chain, &signer);
        assert_eq!(*workflow.state(), MintState::Idle);
    }

    #[tokio::test]
    async fn successful_mint_confirms_with_token_id() {
        let store = MemoryStore::new();
        let chain = SimulatedChain::new();
        let signer = Keypair::generate().expect("keypair");
        let mut workflow = MintWorkflow::new(&store, &chain, &signer);

        let token_id = workflow.submit(&form()).await.expect("should mint");
        assert_eq!(*workflow.state(), MintState::Confirmed { token_id });
    }

    #[tokio::test]
    async fn invalid_price_fails_validation() {
        let store = MemoryStore::new();
        let chain = SimulatedChain::new();
        let signer = Keypair::generate().expect("keypair");
        let mut workflow = MintWorkflow::new(&store, &chain, &signer);

        let mut bad = form();
        bad.price = "abc".to_string();
        let result = workflow.submit(&bad).await;

        assert!(matches!(result, Err(MarketError::InvalidAmount { .. })));
        assert!(matches!(
            workflow.state(),
            MintState::Failed {
                kind: ErrorKind::InvalidAmount,
                ..
            }
        ));
        // Validation failed before anything touched the network.
        assert!(store.is_empty().await);
        assert_eq!(chain.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn staged_image_is_reused_by_submit() {
        let store = MemoryStore::new();
        let chain = SimulatedChain::new();
        let signer = Keypair::generate().expect("keypair");
        let mut workflow = MintWorkflow::new(&store, &chain, &signer);

        let staged = workflow.stage_image(b"pixels").await.expect("should stage");
        let again = workflow.stage_image(b"pixels").await.expect("should stage");
        assert_eq!(staged, again);

        workflow.submit(&form()).await.expect("should mint");
        // Image + metadata only; the staged upload was not repeated.
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn staged_bytes_must_match_form() {
        let store = MemoryStore::new();
        let chain = SimulatedChain::new();
        let signer = Keypair::generate().expect("keypair");
        let mut workflow = MintWorkflow::new(&store, &chain, &signer);

        workflow.stage_image(b"other pixels").await.expect("should stage");
        workflow.submit(&form()).await.expect("should mint");

        // Stale staging was ignored: staged image, form image, metadata.
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn metadata_references_uploaded_image() {
        let store = MemoryStore::new();
        let chain = SimulatedChain::new();
        let signer = Keypair::generate().expect("keypair");
        let gateway = Gateway::default();
        let mut workflow = MintWorkflow::new(&store, &chain, &signer);

        let token_id = workflow.submit(&form()).await.expect("should mint");

        let uri = chain.metadata_uri(token_id).await.expect("should read");
        let metadata_id = ContentId::from_uri(&uri).expect("should parse");
        let metadata: Metadata = store.fetch_json(&metadata_id).await.expect("should fetch");

        let image_id = ContentId::from_bytes(b"pixels");
        assert_eq!(metadata.image, gateway.resolve(&image_id));
        assert_eq!(metadata.owner, *signer.address());
        assert_eq!(metadata.name, "Abstraction #1");
    }
}
