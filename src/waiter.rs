//! Confirmation waiting
//!
//! The waiter only observes: it polls for a receipt until the transaction is
//! mined or the caller's context ends. It never re-signs or re-broadcasts.
//!
//! A [`PoolError::ConfirmationTimeout`] is ambiguous. The transaction is still in
//! the node's pending pool and may be mined after the waiter gives up; query
//! the receipt again later before deciding it was dropped.

use crate::config::ConfirmationConfig;
use crate::connector::ChainConnector;
use crate::context::CallContext;
use crate::error::PoolError;
use crate::types::Receipt;
use alloy::primitives::TxHash;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Polls for receipts and classifies success vs. revert
#[derive(Debug, Clone)]
pub struct ConfirmationWaiter<C> {
    connector: C,
    poll_interval: Duration,
    max_poll_interval: Duration,
}

impl<C: ChainConnector> ConfirmationWaiter<C> {
    /// Waiter polling at a fixed interval
    pub fn new(connector: C, poll_interval: Duration) -> Self {
        Self {
            connector,
            poll_interval,
            max_poll_interval: poll_interval,
        }
    }

    /// Waiter using the polling settings from `config`
    pub fn from_config(connector: C, config: &ConfirmationConfig) -> Self {
        Self::new(connector, config.poll_interval).with_backoff(config.max_poll_interval)
    }

    /// Double the poll interval after each miss, up to `max_interval`
    pub fn with_backoff(mut self, max_interval: Duration) -> Self {
        self.max_poll_interval = max_interval.max(self.poll_interval);
        self
    }

    /// Wait until `hash` is mined or `ctx` ends
    ///
    /// Returns the receipt on success, [`PoolError::ExecutionReverted`] when the
    /// receipt shows a revert, and [`PoolError::ConfirmationTimeout`] on
    /// cancellation or deadline. Connector errors while polling leave the
    /// transaction pending and polling continues.
    pub async fn wait(&self, hash: TxHash, ctx: &CallContext) -> Result<Receipt, PoolError> {
        let mut interval = self.poll_interval;
        let mut attempt: u32 = 0;

        loop {
            if ctx.check().is_err() {
                return Err(self.timed_out(hash, attempt));
            }
            attempt += 1;

            match self.connector.transaction_receipt(hash, ctx).await {
                Ok(Some(receipt)) if receipt.is_success() => {
                    info!(
                        %hash,
                        block = receipt.block_number,
                        gas_used = receipt.gas_used,
                        "transaction mined"
                    );
                    return Ok(receipt);
                }
                Ok(Some(receipt)) => {
                    warn!(
                        %hash,
                        block = receipt.block_number,
                        gas_used = receipt.gas_used,
                        "transaction reverted"
                    );
                    return Err(PoolError::ExecutionReverted { receipt });
                }
                Ok(None) => debug!(%hash, attempt, "transaction pending"),
                Err(err) if err.is_context_stop() => {
                    return Err(self.timed_out(hash, attempt));
                }
                Err(err) => warn!(%hash, attempt, "receipt poll failed, still pending: {}", err),
            }

            if ctx.sleep(interval).await.is_err() {
                return Err(self.timed_out(hash, attempt));
            }
            interval = (interval * 2).min(self.max_poll_interval);
        }
    }

    fn timed_out(&self, hash: TxHash, attempts: u32) -> PoolError {
        warn!(%hash, attempts, "stopped waiting for transaction; it may still be mined");
        PoolError::ConfirmationTimeout { hash }
    }
}
