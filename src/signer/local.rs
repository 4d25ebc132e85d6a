//! Local private key signer implementation

use super::TransactionSigner;
use crate::error::PoolError;
use crate::types::{SignedTransaction, UnsignedTransaction};
use alloy::consensus::{SignableTransaction, TxEnvelope};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Bytes};
use alloy::signers::local::PrivateKeySigner;
use eyre::{Context, Result};

/// Local signer using a private key
///
/// Produces EIP-155 legacy transactions with deterministic (RFC 6979)
/// secp256k1 signatures.
#[derive(Clone)]
pub struct LocalSigner {
    signer: PrivateKeySigner,
    chain_id: Option<u64>,
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.signer.address())
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

impl LocalSigner {
    /// Create a new LocalSigner from a private key hex string
    ///
    /// # Arguments
    ///
    /// * `private_key` - Hex-encoded private key (with or without 0x prefix)
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let signer = LocalSigner::from_private_key("0x...")?.with_chain_id(1);
    /// ```
    pub fn from_private_key(private_key: impl AsRef<str>) -> Result<Self> {
        let key = private_key.as_ref().trim();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let signer: PrivateKeySigner = key.parse().context("Failed to parse private key")?;

        Ok(Self {
            signer,
            chain_id: None,
        })
    }

    /// Signer with a freshly generated key
    pub fn random() -> Self {
        Self {
            signer: PrivateKeySigner::random(),
            chain_id: None,
        }
    }

    /// Refuse to sign for any chain other than `chain_id`
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }
}

impl TransactionSigner for LocalSigner {
    fn address(&self) -> Address {
        self.signer.address()
    }

    fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    fn sign(
        &self,
        tx: &UnsignedTransaction,
        chain_id: u64,
    ) -> Result<SignedTransaction, PoolError> {
        if let Some(bound) = self.chain_id {
            if bound != chain_id {
                return Err(PoolError::Signing(format!(
                    "signer is bound to chain {bound}, refusing to sign for chain {chain_id}"
                )));
            }
        }
        if tx.gas_limit == 0 {
            return Err(PoolError::Signing("gas limit is zero".to_string()));
        }

        let mut legacy = tx.to_legacy(chain_id);
        let signature = self
            .signer
            .sign_transaction_sync(&mut legacy)
            .map_err(|e| PoolError::Signing(e.to_string()))?;

        let signed = legacy.into_signed(signature);
        let hash = *signed.hash();
        let raw = Bytes::from(TxEnvelope::from(signed).encoded_2718());

        Ok(SignedTransaction {
            transaction: tx.clone(),
            chain_id,
            signature,
            hash,
            raw,
        })
    }
}
