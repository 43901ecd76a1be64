use std::env;
use sublink::storage::storage_prefix;
use sublink::utils::encode_prefixed_hex;
use sublink_rpc_caller::{ClientConfig, RpcCallError};
use sublink_tokio_rpc_client::connect;
use tokio::join;

const DEFAULT_NODE_URL: &str = "ws://127.0.0.1:9944";

#[tokio::main]
async fn main() -> Result<(), RpcCallError> {
    // Default log level is INFO; RUST_LOG overrides it.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let url = env::args()
        .nth(1)
        .or_else(|| env::var("SUBLINK_NODE_URL").ok())
        .unwrap_or_else(|| DEFAULT_NODE_URL.to_string());

    tracing::info!("Connecting to {}", url);
    let client = connect(&url, ClientConfig::default()).await?;

    // Identity lookups are independent; `join!` keeps them in flight together.
    let (chain, name, version) = join!(client.chain(), client.node_name(), client.node_version());
    println!("Connected to {} ({} {})", chain?, name?, version?);

    println!(
        "Token: {} ({} decimals), SS58 format {}",
        client.token_symbol().await?,
        client.token_decimals().await?,
        client.ss58_format().await?
    );

    let head = client.chain_head().await?;
    let finalized = client.finalized_head().await?;
    println!("Best block:      {}", head);
    println!("Finalized block: {}", finalized);

    let active = client.ensure_runtime_for(None).await?;
    tracing::info!(
        "Runtime {} (transaction version {}) at block #{}",
        active.runtime_version.unwrap_or_default(),
        active.transaction_version.unwrap_or_default(),
        active.block_number.unwrap_or_default()
    );
    if let Some(metadata) = client.active_metadata() {
        println!("Metadata: {} bytes", metadata.len());
    }

    let now_key = storage_prefix("Timestamp", "Now");
    match client.storage(&now_key, Some(&head)).await? {
        Some(value) => println!("Timestamp::Now = {}", encode_prefixed_hex(&value)),
        None => println!("Timestamp::Now is empty"),
    }

    client.close();
    tracing::info!("Disconnected from {}", url);
    Ok(())
}
