//! Nifty CLI binary entrypoint.
//!
//! Drives the marketplace workflows against the simulated chain and the
//! in-memory content store, with state persisted under `--state-dir` so a
//! mint in one invocation is visible to the next.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nifty_chain::{ChainSnapshot, MarketplaceContract, SimulatedChain};
use nifty_core::{Keypair, Metadata, TokenId};
use nifty_market::{InventoryWorkflow, MintForm, MintWorkflow, PurchaseWorkflow};
use nifty_store::{ContentId, ContentStore, MemoryStore};

/// Nifty marketplace dev client.
#[derive(Debug, Parser)]
#[command(name = "nifty", version, about = "NFT marketplace dev client")]
struct Cli {
    /// Directory holding the dev keypair and simulated network state.
    #[arg(long, env = "NIFTY_STATE_DIR", default_value = ".nifty")]
    state_dir: PathBuf,

    /// Emit machine-readable JSON instead of human output.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate the dev keypair.
    Keygen,

    /// Mint a new token from an image file (listing it at the given price).
    Mint {
        /// Token name.
        #[arg(long)]
        name: String,

        /// Token description.
        #[arg(long)]
        description: String,

        /// Asking price in GEM (decimal).
        #[arg(long)]
        price: String,

        /// Path to the image file.
        #[arg(long)]
        image: PathBuf,
    },

    /// Buy a listed token at its current asking price.
    Buy {
        /// The token to buy.
        token_id: u64,
    },

    /// List tokens owned by the dev account.
    Inventory,

    /// Show one token's listing and metadata.
    Show {
        /// The token to show.
        token_id: u64,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// The locally persisted marketplace environment.
struct DevEnv {
    store: MemoryStore,
    chain: SimulatedChain,
    keypair: Keypair,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Keygen = cli.command {
        return keygen(&cli.state_dir);
    }

    let env = load_env(&cli.state_dir).await?;
    match cli.command {
        Commands::Keygen => unreachable!("handled above"),
        Commands::Mint {
            name,
            description,
            price,
            image,
        } => {
            let bytes = std::fs::read(&image)
                .with_context(|| format!("reading image {}", image.display()))?;
            let form = MintForm {
                name,
                description,
                price,
                image: bytes,
            };
            let mut workflow = MintWorkflow::new(&env.store, &env.chain, &env.keypair);
            let token_id = workflow.submit(&form).await?;
            persist(&cli.state_dir, &env).await?;

            if cli.json {
                println!("{}", serde_json::json!({ "token_id": token_id.value() }));
            } else {
                println!("Minted token {token_id}");
            }
        }
        Commands::Buy { token_id } => {
            let mut workflow = PurchaseWorkflow::new(&env.chain, &env.keypair);
            let listing = workflow.execute(TokenId::new(token_id)).await?;
            persist(&cli.state_dir, &env).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                println!("Bought token {token_id} for {}", listing.price);
            }
        }
        Commands::Inventory => {
            let report = InventoryWorkflow::new(&env.store, &env.chain)
                .load(env.keypair.address())
                .await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report.nfts)?);
            } else if report.nfts.is_empty() {
                println!("No tokens owned by {}", env.keypair.address());
            } else {
                for nft in &report.nfts {
                    println!("#{}  {} — {}", nft.token_id, nft.name, nft.price);
                    println!("    image: {}", nft.image);
                }
            }
            for failure in &report.failures {
                eprintln!("token {} failed to load: {}", failure.token_id, failure.error);
            }
        }
        Commands::Show { token_id } => {
            let token_id = TokenId::new(token_id);
            let listing = env.chain.listing(token_id).await?;
            let token_uri = env.chain.metadata_uri(token_id).await?;
            let content_id = ContentId::from_uri(&token_uri)?;
            let metadata: Metadata = env.store.fetch_json(&content_id).await?;

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "listing": listing,
                        "metadata": metadata,
                    }))?
                );
            } else {
                println!("#{}  {} — {}", token_id, metadata.name, listing.price);
                println!("    {}", metadata.description);
                println!("    image:  {}", metadata.image);
                println!("    owner:  {}", listing.owner);
                println!("    seller: {}", listing.seller);
            }
        }
    }
    Ok(())
}

fn keygen(state_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(state_dir)?;
    let path = state_dir.join("keypair.json");
    if path.exists() {
        bail!("keypair already exists at {}", path.display());
    }
    let keypair = Keypair::generate()?;
    keypair.save(&path)?;
    println!("Generated account {}", keypair.address());
    Ok(())
}

async fn load_env(state_dir: &Path) -> anyhow::Result<DevEnv> {
    let keypair_path = state_dir.join("keypair.json");
    let keypair = Keypair::load(&keypair_path).with_context(|| {
        format!(
            "no dev keypair at {} (run `nifty keygen` first)",
            keypair_path.display()
        )
    })?;

    let store = MemoryStore::new();
    let store_path = state_dir.join("store.json");
    if store_path.exists() {
        let contents = std::fs::read_to_string(&store_path)?;
        let blobs: HashMap<String, Vec<u8>> = serde_json::from_str(&contents)?;
        store.restore(blobs).await;
    }

    let chain = SimulatedChain::new();
    let chain_path = state_dir.join("chain.json");
    if chain_path.exists() {
        let contents = std::fs::read_to_string(&chain_path)?;
        let snapshot: ChainSnapshot = serde_json::from_str(&contents)?;
        chain.restore(snapshot).await;
    }

    Ok(DevEnv {
        store,
        chain,
        keypair,
    })
}

async fn persist(state_dir: &Path, env: &DevEnv) -> anyhow::Result<()> {
    std::fs::create_dir_all(state_dir)?;

    let blobs = env.store.snapshot().await;
    std::fs::write(
        state_dir.join("store.json"),
        serde_json::to_string(&blobs)?,
    )?;

    let snapshot = env.chain.snapshot().await;
    std::fs::write(
        state_dir.join("chain.json"),
        serde_json::to_string(&snapshot)?,
    )?;
    Ok(())
}
