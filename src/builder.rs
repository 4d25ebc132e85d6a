//! Unsigned transaction assembly
//!
//! Three node queries (gas price, pending nonce, gas estimate) each fail with
//! their own [`PoolError`] variant. Nothing is retried here.

use crate::connector::{CallRequest, ChainConnector};
use crate::constants::GAS_MULTIPLIER_BASE_BPS;
use crate::context::CallContext;
use crate::error::PoolError;
use crate::types::UnsignedTransaction;
use alloy::primitives::{Address, Bytes, U256};
use tracing::{debug, warn};

/// Builds unsigned pool transactions from calldata and the signer's chain state
#[derive(Debug, Clone)]
pub struct TransactionBuilder<C> {
    connector: C,
    /// Applied to the gas estimate, 10_000 = estimate as-is
    gas_limit_multiplier_bps: u64,
}

impl<C: ChainConnector> TransactionBuilder<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            gas_limit_multiplier_bps: GAS_MULTIPLIER_BASE_BPS,
        }
    }

    /// Pad the gas estimate, e.g. 12_000 for +20%
    pub fn with_gas_limit_multiplier(mut self, bps: u64) -> Self {
        self.gas_limit_multiplier_bps = bps.max(GAS_MULTIPLIER_BASE_BPS);
        self
    }

    /// Assemble an unsigned transaction calling `contract` with `call_data`
    ///
    /// The nonce is the signer's pending nonce as observed now; value is zero.
    pub async fn build(
        &self,
        call_data: Bytes,
        signer: Address,
        contract: Address,
        ctx: &CallContext,
    ) -> Result<UnsignedTransaction, PoolError> {
        let gas_price = self
            .connector
            .suggest_gas_price(ctx)
            .await
            .map_err(PoolError::FeeQuery)?;

        let nonce = self
            .connector
            .pending_nonce(signer, ctx)
            .await
            .map_err(PoolError::NonceQuery)?;

        let call = CallRequest {
            from: signer,
            to: contract,
            value: U256::ZERO,
            data: call_data,
        };
        let estimate = match self.connector.estimate_gas(&call, ctx).await {
            Ok(gas) => gas,
            Err(err) => {
                let err = PoolError::GasEstimation(err);
                if err.is_probable_revert() {
                    warn!(%contract, "gas estimation reverted, call would fail on-chain: {}", err);
                }
                return Err(err);
            }
        };
        let gas_limit = self.apply_multiplier(estimate);

        debug!(nonce, gas_price, estimate, gas_limit, "built unsigned transaction");

        Ok(UnsignedTransaction {
            nonce,
            to: contract,
            value: U256::ZERO,
            gas_limit,
            gas_price,
            data: call.data,
        })
    }

    fn apply_multiplier(&self, estimate: u64) -> u64 {
        let padded = estimate as u128 * self.gas_limit_multiplier_bps as u128
            / GAS_MULTIPLIER_BASE_BPS as u128;
        u64::try_from(padded).unwrap_or(u64::MAX)
    }
}
