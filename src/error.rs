//! Error types for the yield pool SDK
//!
//! Pipeline failures are reported through [`PoolError`], one variant per step, so
//! callers can branch on where a submission broke. Setup paths (config loading,
//! key parsing, provider construction) use `eyre` for ergonomic context.

use crate::types::Receipt;
use alloy::primitives::TxHash;

pub use eyre::{eyre, Context, Report, Result};

/// Failure reported by a [`ChainConnector`](crate::connector::ChainConnector) call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectorError {
    /// Node could not be reached (connection refused, DNS, HTTP failure, request timeout)
    #[error("node unreachable: {0}")]
    Unreachable(String),
    /// Node answered with a JSON-RPC error object
    #[error("node returned error {code}: {message}")]
    Rpc { code: i64, message: String },
    /// Node answered but the payload could not be interpreted
    #[error("malformed node response: {0}")]
    Malformed(String),
    /// Caller cancelled the surrounding [`CallContext`](crate::context::CallContext)
    #[error("call cancelled")]
    Cancelled,
    /// Deadline of the surrounding [`CallContext`](crate::context::CallContext) elapsed
    #[error("call deadline exceeded")]
    DeadlineExceeded,
}

impl ConnectorError {
    /// Message supplied by the node, if any
    pub fn node_message(&self) -> Option<&str> {
        match self {
            Self::Rpc { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Whether the call was stopped by the caller's context rather than the node
    pub fn is_context_stop(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

/// Why a node refused a broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastRejection {
    /// Nonce already used or already pending (`nonce too low`, `already known`, ...)
    DuplicateNonce,
    /// Gas price below what the node accepts
    Underpriced,
    /// Node rejected the transaction for another reason
    RejectedByNode,
    /// Node never answered
    Unreachable,
}

impl BroadcastRejection {
    /// Classify a connector failure raised by `send_raw_transaction`
    pub fn classify(err: &ConnectorError) -> Self {
        match err {
            ConnectorError::Rpc { message, .. } => Self::from_node_message(message),
            ConnectorError::Malformed(_) => Self::RejectedByNode,
            ConnectorError::Unreachable(_)
            | ConnectorError::Cancelled
            | ConnectorError::DeadlineExceeded => Self::Unreachable,
        }
    }

    /// Classify a node error message as returned by geth-compatible nodes
    pub fn from_node_message(message: &str) -> Self {
        let message = message.to_ascii_lowercase();

        // "replacement transaction underpriced" means the nonce slot is taken
        if message.contains("nonce too low")
            || message.contains("already known")
            || message.contains("known transaction")
            || message.contains("replacement transaction underpriced")
        {
            Self::DuplicateNonce
        } else if message.contains("underpriced")
            || message.contains("fee too low")
            || message.contains("less than block base fee")
        {
            Self::Underpriced
        } else {
            Self::RejectedByNode
        }
    }

    /// Whether rebuilding with a refreshed nonce or fee could succeed
    ///
    /// Retrying a duplicate-nonce or underpriced rejection without refreshing
    /// those values fails the same way every time.
    pub fn is_retryable_with_refresh(&self) -> bool {
        matches!(self, Self::DuplicateNonce | Self::Underpriced | Self::Unreachable)
    }
}

impl std::fmt::Display for BroadcastRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::DuplicateNonce => "duplicate nonce",
            Self::Underpriced => "underpriced",
            Self::RejectedByNode => "rejected by node",
            Self::Unreachable => "node unreachable",
        };
        f.write_str(label)
    }
}

/// Failure of a pool operation, tagged with the pipeline step that produced it
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// Call data could not be encoded or return data could not be decoded
    #[error("failed to encode/decode call data: {0}")]
    Encoding(String),
    /// Whole-token amount is negative, not finite, or too large
    #[error("invalid token amount: {0}")]
    InvalidAmount(f64),
    /// Caller's context ended while waiting for another submission to finish
    #[error("gave up waiting for the nonce lock: {0}")]
    NonceLock(#[source] ConnectorError),
    /// Read-only query (block height) failed
    #[error("chain connector failed: {0}")]
    Connector(#[source] ConnectorError),
    /// Gas price suggestion failed
    #[error("failed to get gas price: {0}")]
    FeeQuery(#[source] ConnectorError),
    /// Pending nonce lookup failed
    #[error("failed to get pending nonce: {0}")]
    NonceQuery(#[source] ConnectorError),
    /// Gas estimation failed; usually the call would revert on-chain
    #[error("failed to estimate gas: {0}")]
    GasEstimation(#[source] ConnectorError),
    /// Local signing failed; never retried
    #[error("failed to sign transaction: {0}")]
    Signing(String),
    /// Node refused the signed transaction
    #[error("failed to broadcast transaction ({kind}): {message}")]
    Broadcast {
        kind: BroadcastRejection,
        message: String,
    },
    /// No receipt before the caller's deadline or cancellation
    ///
    /// The transaction was not retracted and may still be mined later.
    #[error("transaction {hash} not mined before deadline; it may still be mined")]
    ConfirmationTimeout { hash: TxHash },
    /// Transaction was mined but the contract reverted; gas was still spent
    #[error(
        "transaction {} reverted in block {} (gas used {})",
        .receipt.transaction_hash,
        .receipt.block_number,
        .receipt.gas_used
    )]
    ExecutionReverted { receipt: Receipt },
}

impl PoolError {
    /// Build a broadcast failure from the connector error raised by the node
    pub fn broadcast(err: ConnectorError) -> Self {
        Self::Broadcast {
            kind: BroadcastRejection::classify(&err),
            message: err.to_string(),
        }
    }

    /// Whether the on-chain outcome is unknown (the transaction may still mine)
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::ConfirmationTimeout { .. })
    }

    /// Whether the failure indicates the contract rejects the call
    pub fn is_probable_revert(&self) -> bool {
        match self {
            Self::ExecutionReverted { .. } => true,
            Self::GasEstimation(err) => err
                .node_message()
                .map(|m| m.to_ascii_lowercase().contains("revert"))
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Broadcast rejection kind, if this is a broadcast failure
    pub fn broadcast_rejection(&self) -> Option<BroadcastRejection> {
        match self {
            Self::Broadcast { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReceiptStatus;

    fn rpc(message: &str) -> ConnectorError {
        ConnectorError::Rpc {
            code: -32000,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_classify_duplicate_nonce() {
        for msg in [
            "nonce too low",
            "already known",
            "replacement transaction underpriced",
            "Nonce too low: next nonce 7, tx nonce 5",
        ] {
            assert_eq!(
                BroadcastRejection::classify(&rpc(msg)),
                BroadcastRejection::DuplicateNonce,
                "{msg}"
            );
        }
    }

    #[test]
    fn test_classify_underpriced() {
        assert_eq!(
            BroadcastRejection::classify(&rpc("transaction underpriced")),
            BroadcastRejection::Underpriced
        );
        assert_eq!(
            BroadcastRejection::classify(&rpc(
                "max fee per gas less than block base fee"
            )),
            BroadcastRejection::Underpriced
        );
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(
            BroadcastRejection::classify(&rpc("insufficient funds for gas * price + value")),
            BroadcastRejection::RejectedByNode
        );
        assert_eq!(
            BroadcastRejection::classify(&ConnectorError::Unreachable("connection refused".into())),
            BroadcastRejection::Unreachable
        );
        assert_eq!(
            BroadcastRejection::classify(&ConnectorError::DeadlineExceeded),
            BroadcastRejection::Unreachable
        );
    }

    #[test]
    fn test_broadcast_error_keeps_node_message() {
        let err = PoolError::broadcast(rpc("nonce too low"));
        assert_eq!(err.broadcast_rejection(), Some(BroadcastRejection::DuplicateNonce));
        assert!(err.to_string().contains("nonce too low"));
        assert!(err.to_string().contains("duplicate nonce"));
    }

    #[test]
    fn test_probable_revert() {
        let est = PoolError::GasEstimation(rpc("execution reverted: insufficient stake"));
        assert!(est.is_probable_revert());
        assert!(!PoolError::GasEstimation(ConnectorError::Unreachable("x".into()))
            .is_probable_revert());

        let reverted = PoolError::ExecutionReverted {
            receipt: Receipt {
                transaction_hash: TxHash::ZERO,
                block_number: 10,
                status: ReceiptStatus::Failure,
                gas_used: 21_000,
            },
        };
        assert!(reverted.is_probable_revert());
        assert!(!reverted.is_ambiguous());
        assert!(PoolError::ConfirmationTimeout { hash: TxHash::ZERO }.is_ambiguous());
    }

    #[test]
    fn test_retryable_with_refresh() {
        assert!(BroadcastRejection::DuplicateNonce.is_retryable_with_refresh());
        assert!(BroadcastRejection::Underpriced.is_retryable_with_refresh());
        assert!(!BroadcastRejection::RejectedByNode.is_retryable_with_refresh());
    }
}
