//! Print pool statistics and the signer's position
//!
//! Run with: cargo run --example pool_status
//!
//! Requires RPC_URL, POOL_ADDRESS and PRIVATE_KEY. Pass `--claim` to also claim
//! pending rewards and wait for the receipt.

use std::time::Duration;

use eyre::Context;
use yield_pool_sdk::{CallContext, LocalSigner, NetworkConfig, PoolClient};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = NetworkConfig::from_env()?;
    let private_key = std::env::var("PRIVATE_KEY").context("PRIVATE_KEY must be set")?;
    let signer = LocalSigner::from_private_key(&private_key)?.with_chain_id(config.chain_id);
    let client = PoolClient::connect(signer, config)?;

    println!("Connected wallet: {}", client.address());
    println!("Pool:             {}", client.pool());

    let ctx = CallContext::with_timeout(Duration::from_secs(30));
    let height = client.latest_block_height(&ctx).await?;
    println!("Latest block:     {}", height);

    let info = client.get_pool_info().await?;
    println!("\nPool info:\n{}", serde_json::to_string_pretty(&info)?);
    println!("TVL: {:.2} tokens, APY: {:.2}%", info.tvl_tokens(), info.apy_percent());

    let position = client.get_user_position(client.address()).await?;
    println!("\nPosition:\n{}", serde_json::to_string_pretty(&position)?);

    if std::env::args().any(|arg| arg == "--claim") {
        let ctx = CallContext::with_timeout(Duration::from_secs(180));
        let hash = client.claim_rewards(&ctx).await?;
        println!("\nClaim submitted: {}", hash);

        match client.wait_for_transaction(hash, &ctx).await {
            Ok(receipt) => println!(
                "Mined in block {} (gas used {})",
                receipt.block_number, receipt.gas_used
            ),
            Err(err) if err.is_ambiguous() => {
                println!("Not mined yet, check {} again later", hash)
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}
