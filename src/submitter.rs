//! Broadcast of signed transactions

use crate::connector::ChainConnector;
use crate::context::CallContext;
use crate::error::PoolError;
use crate::types::SignedTransaction;
use alloy::primitives::TxHash;
use tracing::{info, warn};

/// Sends signed transactions to the node's pending pool
#[derive(Debug, Clone)]
pub struct Submitter<C> {
    connector: C,
}

impl<C: ChainConnector> Submitter<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// Broadcast `tx` and return its hash
    ///
    /// Rejections are classified into [`BroadcastRejection`](crate::error::BroadcastRejection)
    /// so the caller can decide whether rebuilding with a fresh nonce or fee
    /// is worthwhile.
    pub async fn broadcast(
        &self,
        tx: &SignedTransaction,
        ctx: &CallContext,
    ) -> Result<TxHash, PoolError> {
        let hash = self
            .connector
            .send_raw_transaction(&tx.raw, ctx)
            .await
            .map_err(|err| {
                let err = PoolError::broadcast(err);
                warn!(nonce = tx.nonce(), hash = %tx.hash, "broadcast rejected: {}", err);
                err
            })?;

        if hash != tx.hash {
            warn!(local = %tx.hash, node = %hash, "node reported a different transaction hash");
        }

        info!(nonce = tx.nonce(), %hash, "transaction broadcast");
        Ok(hash)
    }
}
