//! Transaction signer abstraction
//!
//! Signing is purely local: a signer turns an [`UnsignedTransaction`] into a
//! [`SignedTransaction`] bound to one chain and never touches the network. Key
//! custody stays behind the trait; the pipeline only ever sees the signer's
//! address.

mod local;

pub use local::LocalSigner;

use crate::error::PoolError;
use crate::types::{SignedTransaction, UnsignedTransaction};
use alloy::primitives::Address;

/// Trait for signing EVM transactions
pub trait TransactionSigner: Send + Sync {
    /// Returns the signer's EVM address
    fn address(&self) -> Address;

    /// Chain this signer is restricted to, if any
    fn chain_id(&self) -> Option<u64>;

    /// Signs `tx` for `chain_id`
    ///
    /// Deterministic for the same key, transaction and chain. Fails with
    /// [`PoolError::Signing`] only on malformed input.
    fn sign(
        &self,
        tx: &UnsignedTransaction,
        chain_id: u64,
    ) -> Result<SignedTransaction, PoolError>;
}
