//! PoolClient - main entry point for the SDK

use crate::builder::TransactionBuilder;
use crate::config::NetworkConfig;
use crate::connector::{ChainConnector, RpcConnector};
use crate::constants::{checked_scale_token, scale_token};
use crate::contracts::CallIntent;
use crate::context::CallContext;
use crate::error::{BroadcastRejection, PoolError};
use crate::nonce::NonceAllocator;
use crate::signer::TransactionSigner;
use crate::submitter::Submitter;
use crate::types::{PoolInfo, Receipt, UserPosition};
use crate::waiter::ConfirmationWaiter;
use alloy::primitives::{Address, TxHash, U256};
use eyre::{eyre, Result};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Main client for interacting with the yield pool
///
/// Owns its connector and signer; nothing is process-global. Submissions from
/// one client are serialized through its [`NonceAllocator`], so concurrent calls
/// get consecutive nonces instead of colliding.
pub struct PoolClient<C: ChainConnector, S: TransactionSigner> {
    signer: S,
    config: NetworkConfig,
    connector: Arc<C>,
    builder: TransactionBuilder<Arc<C>>,
    submitter: Submitter<Arc<C>>,
    waiter: ConfirmationWaiter<Arc<C>>,
    nonces: Arc<NonceAllocator>,
}

impl<S: TransactionSigner> PoolClient<RpcConnector, S> {
    /// Create a client talking JSON-RPC to `config.rpc_url`
    pub fn connect(signer: S, config: NetworkConfig) -> Result<Self> {
        let connector = RpcConnector::from_config(&config)?;
        Self::new(connector, signer, config)
    }
}

impl<C: ChainConnector, S: TransactionSigner> PoolClient<C, S> {
    /// Create a client over an existing connector
    ///
    /// Fails if the signer is bound to a chain other than `config.chain_id`.
    pub fn new(connector: C, signer: S, config: NetworkConfig) -> Result<Self> {
        if let Some(bound) = signer.chain_id() {
            if bound != config.chain_id {
                return Err(eyre!(
                    "signer is bound to chain {}, but the client is configured for chain {}",
                    bound,
                    config.chain_id
                ));
            }
        }

        let connector = Arc::new(connector);
        let builder = TransactionBuilder::new(Arc::clone(&connector))
            .with_gas_limit_multiplier(config.gas_limit_multiplier_bps);
        let submitter = Submitter::new(Arc::clone(&connector));
        let waiter = ConfirmationWaiter::from_config(Arc::clone(&connector), &config.confirmation);

        Ok(Self {
            signer,
            config,
            connector,
            builder,
            submitter,
            waiter,
            nonces: Arc::new(NonceAllocator::new()),
        })
    }

    /// Share a nonce allocator with other clients using the same key
    pub fn with_nonce_allocator(mut self, nonces: Arc<NonceAllocator>) -> Self {
        self.nonces = nonces;
        self
    }

    /// Get the signer's address
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Chain transactions are signed for
    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    /// Pool contract address
    pub fn pool(&self) -> Address {
        self.config.pool
    }

    /// Get the network configuration
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    // ========== Pool Operations ==========

    /// Stake `amount` tokens (raw, 18 decimals)
    ///
    /// Returns as soon as the node accepts the transaction; call
    /// [`wait_for_transaction`](Self::wait_for_transaction) to confirm it.
    pub async fn deposit(&self, amount: U256, ctx: &CallContext) -> Result<TxHash, PoolError> {
        self.submit(CallIntent::Deposit { amount }, ctx).await
    }

    /// Stake a whole-token amount, e.g. `1.5`
    ///
    /// Negative, non-finite and out-of-range amounts fail with
    /// [`PoolError::InvalidAmount`] before anything is sent.
    pub async fn deposit_tokens(&self, amount: f64, ctx: &CallContext) -> Result<TxHash, PoolError> {
        self.deposit(token_amount(amount)?, ctx).await
    }

    /// Unstake `amount` tokens (raw, 18 decimals)
    pub async fn withdraw(&self, amount: U256, ctx: &CallContext) -> Result<TxHash, PoolError> {
        self.submit(CallIntent::Withdraw { amount }, ctx).await
    }

    /// Unstake a whole-token amount
    pub async fn withdraw_tokens(
        &self,
        amount: f64,
        ctx: &CallContext,
    ) -> Result<TxHash, PoolError> {
        self.withdraw(token_amount(amount)?, ctx).await
    }

    /// Claim accrued rewards
    pub async fn claim_rewards(&self, ctx: &CallContext) -> Result<TxHash, PoolError> {
        self.submit(CallIntent::ClaimRewards, ctx).await
    }

    /// Encode, build, sign and broadcast one pool call
    ///
    /// The nonce region (fee query through broadcast) is held for the whole
    /// pipeline. Waiting for it honours `ctx`: if another submission holds it
    /// past the deadline, this fails with [`PoolError::NonceLock`]. Failures
    /// are returned as-is; retrying is left to the caller, who should rebuild
    /// rather than resend after a nonce or fee rejection.
    pub async fn submit(&self, intent: CallIntent, ctx: &CallContext) -> Result<TxHash, PoolError> {
        let data = intent.encode();
        let from = self.address();
        let pool = self.config.pool;
        info!(method = intent.method(), %from, %pool, "submitting pool call");

        let mut nonces = ctx
            .run(async { Ok(self.nonces.lock().await) })
            .await
            .map_err(PoolError::NonceLock)?;

        let mut tx = self.builder.build(data, from, pool, ctx).await?;
        let nonce = nonces.assign(tx.nonce);
        if nonce != tx.nonce {
            debug!(pending = tx.nonce, nonce, "node pending nonce behind local cursor");
            tx.nonce = nonce;
        }

        let signed = self.signer.sign(&tx, self.config.chain_id)?;

        match self.submitter.broadcast(&signed, ctx).await {
            Ok(hash) => {
                nonces.commit(nonce);
                info!(method = intent.method(), nonce, %hash, "pool call submitted");
                Ok(hash)
            }
            Err(err) => {
                if err.broadcast_rejection() == Some(BroadcastRejection::DuplicateNonce) {
                    nonces.reset();
                }
                Err(err)
            }
        }
    }

    // ========== Confirmation & Chain Queries ==========

    /// Wait for a transaction to be mined
    ///
    /// Uses the configured confirmation timeout when `ctx` has no deadline. A
    /// [`PoolError::ConfirmationTimeout`] does not mean the transaction failed:
    /// it may still be mined later.
    pub async fn wait_for_transaction(
        &self,
        hash: TxHash,
        ctx: &CallContext,
    ) -> Result<Receipt, PoolError> {
        let ctx = match ctx.deadline() {
            Some(_) => ctx.clone(),
            None => ctx
                .clone()
                .with_timeout_from_now(self.config.confirmation.timeout),
        };

        info!(%hash, "waiting for transaction to be mined");
        self.waiter.wait(hash, &ctx).await
    }

    /// Latest block number
    pub async fn latest_block_height(&self, ctx: &CallContext) -> Result<u64, PoolError> {
        self.connector
            .latest_block_number(ctx)
            .await
            .map_err(PoolError::Connector)
    }

    // ========== Pool Queries ==========

    /// Pool statistics
    ///
    /// Returns fixed illustrative values; view-function decoding is not wired up.
    pub async fn get_pool_info(&self) -> Result<PoolInfo, PoolError> {
        Ok(PoolInfo {
            total_value_locked: scale_token(1000.0),
            current_apy: U256::from(1500u64),
            reward_rate: scale_token(1.0),
            last_update_time: U256::from(unix_now()),
        })
    }

    /// Position of `user` in the pool
    ///
    /// Returns fixed illustrative values; view-function decoding is not wired up.
    pub async fn get_user_position(&self, user: Address) -> Result<UserPosition, PoolError> {
        debug!(%user, "returning placeholder position");
        Ok(UserPosition {
            staked_balance: scale_token(10.0),
            pending_rewards: scale_token(0.5),
            last_claim_time: U256::from(unix_now().saturating_sub(3600)),
            reward_debt: U256::ZERO,
        })
    }
}

fn token_amount(amount: f64) -> Result<U256, PoolError> {
    checked_scale_token(amount).ok_or(PoolError::InvalidAmount(amount))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
