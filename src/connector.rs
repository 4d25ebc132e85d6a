//! Chain connector abstraction
//!
//! [`ChainConnector`] is the only way the pipeline talks to a node. Each method is
//! a single request/response round-trip run under a [`CallContext`]; there are no
//! retries at this layer.

use crate::config::NetworkConfig;
use crate::context::CallContext;
use crate::error::ConnectorError;
use crate::types::Receipt;
use alloy::network::{Ethereum, ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::http::reqwest::Url;
use alloy::transports::{RpcError, TransportError};
use eyre::{Context, Result};
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

/// Call simulated by `eth_estimateGas`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

/// Node operations used by the submission pipeline
pub trait ChainConnector: Send + Sync {
    /// Suggested legacy gas price in wei (`eth_gasPrice`)
    fn suggest_gas_price(
        &self,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<u128, ConnectorError>> + Send;

    /// Next nonce for `address` counting pending transactions
    fn pending_nonce(
        &self,
        address: Address,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<u64, ConnectorError>> + Send;

    /// Gas needed to execute `call` against current state
    fn estimate_gas(
        &self,
        call: &CallRequest,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<u64, ConnectorError>> + Send;

    /// Broadcast an EIP-2718 encoded signed transaction
    fn send_raw_transaction(
        &self,
        raw: &Bytes,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<TxHash, ConnectorError>> + Send;

    /// Number of the latest block
    fn latest_block_number(
        &self,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<u64, ConnectorError>> + Send;

    /// Receipt of `hash`, or `None` while it is not mined
    fn transaction_receipt(
        &self,
        hash: TxHash,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<Option<Receipt>, ConnectorError>> + Send;
}

impl<C: ChainConnector> ChainConnector for Arc<C> {
    fn suggest_gas_price(
        &self,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<u128, ConnectorError>> + Send {
        (**self).suggest_gas_price(ctx)
    }

    fn pending_nonce(
        &self,
        address: Address,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<u64, ConnectorError>> + Send {
        (**self).pending_nonce(address, ctx)
    }

    fn estimate_gas(
        &self,
        call: &CallRequest,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<u64, ConnectorError>> + Send {
        (**self).estimate_gas(call, ctx)
    }

    fn send_raw_transaction(
        &self,
        raw: &Bytes,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<TxHash, ConnectorError>> + Send {
        (**self).send_raw_transaction(raw, ctx)
    }

    fn latest_block_number(
        &self,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<u64, ConnectorError>> + Send {
        (**self).latest_block_number(ctx)
    }

    fn transaction_receipt(
        &self,
        hash: TxHash,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<Option<Receipt>, ConnectorError>> + Send {
        (**self).transaction_receipt(hash, ctx)
    }
}

impl From<TransportError> for ConnectorError {
    fn from(err: TransportError) -> Self {
        match err {
            RpcError::ErrorResp(payload) => Self::Rpc {
                code: payload.code,
                message: payload.message.to_string(),
            },
            RpcError::NullResp => Self::Malformed("null response".to_string()),
            RpcError::DeserError { err, text } => {
                let snippet: String = text.chars().take(200).collect();
                Self::Malformed(format!("{err}: {snippet}"))
            }
            RpcError::Transport(kind) => Self::Unreachable(kind.to_string()),
            other => Self::Unreachable(other.to_string()),
        }
    }
}

/// Convert a node receipt; a mined receipt always carries its block number
fn receipt_from_rpc(receipt: &TransactionReceipt) -> Result<Receipt, ConnectorError> {
    let block_number = receipt.block_number.ok_or_else(|| {
        ConnectorError::Malformed(format!(
            "receipt for {} has no block number",
            receipt.transaction_hash
        ))
    })?;

    Ok(Receipt {
        transaction_hash: receipt.transaction_hash,
        block_number,
        status: ReceiptResponse::status(receipt).into(),
        gas_used: receipt.gas_used,
    })
}

/// Type alias for read-only provider
type ReadProvider = Arc<RootProvider<Ethereum>>;

/// JSON-RPC connector over HTTP
///
/// The provider carries no fillers: nonce, gas and signing are handled by the
/// pipeline, not by alloy.
#[derive(Clone)]
pub struct RpcConnector {
    provider: ReadProvider,
    request_timeout: Duration,
}

impl RpcConnector {
    /// Connect to `rpc_url` with the default request timeout
    pub fn connect(rpc_url: impl AsRef<str>) -> Result<Self> {
        let url: Url = rpc_url.as_ref().parse().context("Invalid RPC URL")?;
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .network::<Ethereum>()
            .connect_http(url);

        Ok(Self {
            provider: Arc::new(provider),
            request_timeout: crate::constants::DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Connect using the RPC URL and timeout from `config`
    pub fn from_config(config: &NetworkConfig) -> Result<Self> {
        Ok(Self::connect(&config.rpc_url)?.with_request_timeout(config.request_timeout))
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Run one RPC request under the context and the per-request timeout
    async fn request<T, F>(&self, ctx: &CallContext, call: F) -> Result<T, ConnectorError>
    where
        F: IntoFuture<Output = Result<T, TransportError>>,
    {
        let timeout = self.request_timeout;
        let fut = call.into_future();

        ctx.run(async move {
            match tokio::time::timeout(timeout, fut).await {
                Ok(res) => res.map_err(ConnectorError::from),
                Err(_) => Err(ConnectorError::Unreachable(format!(
                    "request timed out after {}ms",
                    timeout.as_millis()
                ))),
            }
        })
        .await
    }
}

impl ChainConnector for RpcConnector {
    async fn suggest_gas_price(&self, ctx: &CallContext) -> Result<u128, ConnectorError> {
        self.request(ctx, self.provider.get_gas_price()).await
    }

    async fn pending_nonce(
        &self,
        address: Address,
        ctx: &CallContext,
    ) -> Result<u64, ConnectorError> {
        self.request(ctx, self.provider.get_transaction_count(address).pending())
            .await
    }

    async fn estimate_gas(
        &self,
        call: &CallRequest,
        ctx: &CallContext,
    ) -> Result<u64, ConnectorError> {
        let tx = TransactionRequest::default()
            .with_from(call.from)
            .with_to(call.to)
            .with_value(call.value)
            .with_input(call.data.clone());

        self.request(ctx, self.provider.estimate_gas(tx)).await
    }

    async fn send_raw_transaction(
        &self,
        raw: &Bytes,
        ctx: &CallContext,
    ) -> Result<TxHash, ConnectorError> {
        let pending = self
            .request(ctx, self.provider.send_raw_transaction(raw))
            .await?;
        Ok(*pending.tx_hash())
    }

    async fn latest_block_number(&self, ctx: &CallContext) -> Result<u64, ConnectorError> {
        self.request(ctx, self.provider.get_block_number()).await
    }

    async fn transaction_receipt(
        &self,
        hash: TxHash,
        ctx: &CallContext,
    ) -> Result<Option<Receipt>, ConnectorError> {
        let receipt: Option<TransactionReceipt> = self
            .request(ctx, self.provider.get_transaction_receipt(hash))
            .await?;

        receipt.as_ref().map(receipt_from_rpc).transpose()
    }
}
