//! In-memory chain connector for unit tests

use crate::connector::{CallRequest, ChainConnector};
use crate::context::CallContext;
use crate::error::ConnectorError;
use crate::types::{Receipt, ReceiptStatus, UnsignedTransaction};
use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{address, Address, Bytes, TxHash, U256};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

pub const TEST_CHAIN_ID: u64 = 31337;
pub const POOL: Address = address!("1234567890123456789012345678901234567890");
pub const USER: Address = address!("00000000000000000000000000000000000000f1");

/// JSON-RPC style node error
pub fn rpc_error(message: &str) -> ConnectorError {
    ConnectorError::Rpc {
        code: -32000,
        message: message.to_string(),
    }
}

/// Plausible unsigned pool call
pub fn unsigned_tx(nonce: u64) -> UnsignedTransaction {
    UnsignedTransaction {
        nonce,
        to: POOL,
        value: U256::ZERO,
        gas_limit: 60_000,
        gas_price: 1_000_000_000,
        data: Bytes::from(vec![0xb6, 0xb5, 0x5f, 0x25]),
    }
}

#[derive(Default)]
struct MockState {
    gas_price_error: Option<ConnectorError>,
    gas_price_queries: usize,
    block_number_error: Option<ConnectorError>,
    pending_nonce: u64,
    nonce_error: Option<ConnectorError>,
    gas_estimate_error: Option<ConnectorError>,
    broadcast_error: Option<ConnectorError>,
    enforce_nonces: bool,
    advance_pending_on_broadcast: bool,
    seen_nonces: HashSet<u64>,
    broadcasts: Vec<u64>,
    estimated: Vec<CallRequest>,
    scripted_receipts: VecDeque<Result<Option<Receipt>, ConnectorError>>,
    mined: HashMap<TxHash, Receipt>,
    receipt_polls: usize,
    block_number: u64,
    latency: Duration,
}

/// Scriptable [`ChainConnector`]
///
/// Broadcasts are decoded so the mock can report the real transaction hash and,
/// when enforcing nonces, reject a nonce it has already accepted the way a geth
/// node does.
pub struct MockConnector {
    state: Mutex<MockState>,
}

impl MockConnector {
    pub const GAS_PRICE: u128 = 2_000_000_000;
    pub const GAS_ESTIMATE: u64 = 55_000;

    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                block_number: 19_000_000,
                ..Default::default()
            }),
        }
    }

    pub fn with_pending_nonce(self, nonce: u64) -> Self {
        self.set_pending_nonce(nonce);
        self
    }

    /// Reject broadcasts that reuse a nonce
    pub fn enforcing_nonces(self) -> Self {
        self.state.lock().unwrap().enforce_nonces = true;
        self
    }

    /// Bump the pending nonce after each accepted broadcast
    pub fn advancing_pending_nonce(self) -> Self {
        self.state.lock().unwrap().advance_pending_on_broadcast = true;
        self
    }

    /// Delay every call, to force interleaving between concurrent callers
    pub fn with_latency(self, latency: Duration) -> Self {
        self.state.lock().unwrap().latency = latency;
        self
    }

    pub fn set_pending_nonce(&self, nonce: u64) {
        self.state.lock().unwrap().pending_nonce = nonce;
    }

    pub fn set_block_number(&self, block: u64) {
        self.state.lock().unwrap().block_number = block;
    }

    pub fn fail_gas_price(&self, err: ConnectorError) {
        self.state.lock().unwrap().gas_price_error = Some(err);
    }

    pub fn fail_block_number(&self, err: ConnectorError) {
        self.state.lock().unwrap().block_number_error = Some(err);
    }

    pub fn fail_pending_nonce(&self, err: ConnectorError) {
        self.state.lock().unwrap().nonce_error = Some(err);
    }

    pub fn fail_gas_estimate(&self, err: ConnectorError) {
        self.state.lock().unwrap().gas_estimate_error = Some(err);
    }

    pub fn fail_broadcast(&self, err: ConnectorError) {
        self.state.lock().unwrap().broadcast_error = Some(err);
    }

    /// Answers for the next receipt polls, in order
    pub fn script_receipts(
        &self,
        answers: impl IntoIterator<Item = Result<Option<Receipt>, ConnectorError>>,
    ) {
        self.state.lock().unwrap().scripted_receipts.extend(answers);
    }

    /// Make `hash` mined with the given outcome
    pub fn mine(&self, hash: TxHash, status: ReceiptStatus, gas_used: u64) {
        let mut state = self.state.lock().unwrap();
        let block_number = state.block_number;
        state.mined.insert(
            hash,
            Receipt {
                transaction_hash: hash,
                block_number,
                status,
                gas_used,
            },
        );
    }

    pub fn receipt(hash: TxHash, status: ReceiptStatus, gas_used: u64) -> Receipt {
        Receipt {
            transaction_hash: hash,
            block_number: 19_000_001,
            status,
            gas_used,
        }
    }

    /// Nonces of accepted broadcasts, in order
    pub fn broadcast_nonces(&self) -> Vec<u64> {
        self.state.lock().unwrap().broadcasts.clone()
    }

    pub fn gas_price_queries(&self) -> usize {
        self.state.lock().unwrap().gas_price_queries
    }

    pub fn broadcast_count(&self) -> usize {
        self.state.lock().unwrap().broadcasts.len()
    }

    pub fn estimated_calls(&self) -> Vec<CallRequest> {
        self.state.lock().unwrap().estimated.clone()
    }

    pub fn receipt_polls(&self) -> usize {
        self.state.lock().unwrap().receipt_polls
    }

    async fn simulate_latency(&self) {
        let latency = self.state.lock().unwrap().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    fn accept_broadcast(&self, raw: &Bytes) -> Result<TxHash, ConnectorError> {
        let envelope = TxEnvelope::decode_2718(&mut raw.as_ref())
            .map_err(|e| ConnectorError::Rpc {
                code: -32602,
                message: format!("rlp: {e}"),
            })?;
        let nonce = envelope.nonce();

        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.broadcast_error.clone() {
            return Err(err);
        }
        if state.enforce_nonces && !state.seen_nonces.insert(nonce) {
            return Err(rpc_error("already known"));
        }
        state.broadcasts.push(nonce);
        if state.advance_pending_on_broadcast {
            state.pending_nonce = state.pending_nonce.max(nonce + 1);
        }
        Ok(*envelope.tx_hash())
    }
}

impl ChainConnector for MockConnector {
    async fn suggest_gas_price(&self, ctx: &CallContext) -> Result<u128, ConnectorError> {
        ctx.run(async {
            self.state.lock().unwrap().gas_price_queries += 1;
            self.simulate_latency().await;
            match self.state.lock().unwrap().gas_price_error.clone() {
                Some(err) => Err(err),
                None => Ok(Self::GAS_PRICE),
            }
        })
        .await
    }

    async fn pending_nonce(
        &self,
        _address: Address,
        ctx: &CallContext,
    ) -> Result<u64, ConnectorError> {
        ctx.run(async {
            self.simulate_latency().await;
            let state = self.state.lock().unwrap();
            match state.nonce_error.clone() {
                Some(err) => Err(err),
                None => Ok(state.pending_nonce),
            }
        })
        .await
    }

    async fn estimate_gas(
        &self,
        call: &CallRequest,
        ctx: &CallContext,
    ) -> Result<u64, ConnectorError> {
        ctx.run(async {
            self.simulate_latency().await;
            let mut state = self.state.lock().unwrap();
            state.estimated.push(call.clone());
            match state.gas_estimate_error.clone() {
                Some(err) => Err(err),
                None => Ok(Self::GAS_ESTIMATE),
            }
        })
        .await
    }

    async fn send_raw_transaction(
        &self,
        raw: &Bytes,
        ctx: &CallContext,
    ) -> Result<TxHash, ConnectorError> {
        ctx.run(async {
            self.simulate_latency().await;
            self.accept_broadcast(raw)
        })
        .await
    }

    async fn latest_block_number(&self, ctx: &CallContext) -> Result<u64, ConnectorError> {
        ctx.run(async {
            let state = self.state.lock().unwrap();
            match state.block_number_error.clone() {
                Some(err) => Err(err),
                None => Ok(state.block_number),
            }
        })
        .await
    }

    async fn transaction_receipt(
        &self,
        hash: TxHash,
        ctx: &CallContext,
    ) -> Result<Option<Receipt>, ConnectorError> {
        ctx.run(async {
            let mut state = self.state.lock().unwrap();
            state.receipt_polls += 1;
            if let Some(answer) = state.scripted_receipts.pop_front() {
                return answer;
            }
            Ok(state.mined.get(&hash).cloned())
        })
        .await
    }
}
