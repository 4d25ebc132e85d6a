//! Yield Pool SDK for Rust
//!
//! A Rust SDK for staking into an EVM yield pool contract.
//!
//! # Features
//!
//! - Deposit to and withdraw from the pool
//! - Claim accrued rewards
//! - Wait for confirmation, with revert detection
//! - Per-signer nonce coordination for concurrent submissions
//!
//! Every state-changing call goes through the same pipeline:
//! [`TransactionBuilder`] → [`TransactionSigner`] → [`Submitter`] →
//! [`ConfirmationWaiter`]. [`PoolClient`] wires them together.
//!
//! # Example
//!
//! ```rust,ignore
//! use yield_pool_sdk::{CallContext, LocalSigner, NetworkConfig, PoolClient};
//!
//! #[tokio::main]
//! async fn main() -> eyre::Result<()> {
//!     let config = NetworkConfig::from_env()?;
//!     let signer = LocalSigner::from_private_key("0x...")?.with_chain_id(config.chain_id);
//!     let client = PoolClient::connect(signer, config)?;
//!
//!     let ctx = CallContext::with_timeout(std::time::Duration::from_secs(60));
//!     let hash = client.deposit_tokens(1.5, &ctx).await?;
//!     let receipt = client.wait_for_transaction(hash, &ctx).await?;
//!     println!("mined in block {}", receipt.block_number);
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod connector;
pub mod constants;
pub mod context;
pub mod contracts;
pub mod error;
pub mod nonce;
pub mod signer;
pub mod submitter;
pub mod types;
pub mod waiter;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use builder::TransactionBuilder;
pub use client::PoolClient;
pub use config::{ConfirmationConfig, NetworkConfig};
pub use connector::{CallRequest, ChainConnector, RpcConnector};
pub use context::{CallContext, CancelHandle};
pub use contracts::CallIntent;
pub use error::{
    eyre, BroadcastRejection, ConnectorError, Context, PoolError, Report, Result,
};
pub use nonce::NonceAllocator;
pub use signer::{LocalSigner, TransactionSigner};
pub use submitter::Submitter;
pub use types::{PoolInfo, Receipt, ReceiptStatus, SignedTransaction, UnsignedTransaction, UserPosition};
pub use waiter::ConfirmationWaiter;
