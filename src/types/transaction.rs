//! Transaction lifecycle types: unsigned → signed → receipt

use alloy::consensus::TxLegacy;
use alloy::primitives::{Address, Bytes, Signature, TxHash, TxKind, U256};
use serde::Serialize;

/// Transaction assembled by the builder, not yet signed
///
/// Built fresh for every call and never reused: the nonce would collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    /// Sender nonce (taken from the node's pending view)
    pub nonce: u64,
    /// Destination contract
    pub to: Address,
    /// Native value in wei (zero for pool calls)
    pub value: U256,
    /// Gas limit from estimation
    pub gas_limit: u64,
    /// Gas price in wei
    pub gas_price: u128,
    /// Encoded calldata
    pub data: Bytes,
}

impl UnsignedTransaction {
    /// Legacy EIP-155 transaction bound to `chain_id`
    pub fn to_legacy(&self, chain_id: u64) -> TxLegacy {
        TxLegacy {
            chain_id: Some(chain_id),
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: TxKind::Call(self.to),
            value: self.value,
            input: self.data.clone(),
        }
    }
}

/// Transaction signed for a specific chain
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    /// The transaction that was signed
    pub transaction: UnsignedTransaction,
    /// Chain the signature is bound to
    pub chain_id: u64,
    /// secp256k1 signature over the EIP-155 signing hash
    pub signature: Signature,
    /// Transaction hash, used as the receipt lookup key
    pub hash: TxHash,
    /// EIP-2718 encoding sent with `eth_sendRawTransaction`
    pub raw: Bytes,
}

impl SignedTransaction {
    /// Nonce carried by the signed transaction
    pub fn nonce(&self) -> u64 {
        self.transaction.nonce
    }
}

/// Execution outcome recorded in a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Success,
    Failure,
}

impl From<bool> for ReceiptStatus {
    fn from(success: bool) -> Self {
        if success {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// Receipt of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub status: ReceiptStatus,
    pub gas_used: u64,
}

impl Receipt {
    /// Whether the transaction executed without reverting
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}
