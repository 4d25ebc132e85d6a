//! Logical pool calls and their ABI encoding

use super::IYieldPool;
use crate::error::PoolError;
use alloy::primitives::{Bytes, U256};
use alloy::sol_types::{SolCall, SolInterface};

/// A state-changing pool call: method plus ordered arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallIntent {
    Deposit { amount: U256 },
    Withdraw { amount: U256 },
    ClaimRewards,
}

impl CallIntent {
    /// Contract method name
    pub fn method(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "deposit",
            Self::Withdraw { .. } => "withdraw",
            Self::ClaimRewards => "claimRewards",
        }
    }

    /// ABI-encode into calldata (selector + arguments)
    pub fn encode(&self) -> Bytes {
        let data = match self {
            Self::Deposit { amount } => IYieldPool::depositCall { amount: *amount }.abi_encode(),
            Self::Withdraw { amount } => IYieldPool::withdrawCall { amount: *amount }.abi_encode(),
            Self::ClaimRewards => IYieldPool::claimRewardsCall {}.abi_encode(),
        };
        Bytes::from(data)
    }

    /// Decode calldata back into an intent
    ///
    /// Fails on unknown selectors, truncated arguments, and calls to view
    /// functions (those are not intents).
    pub fn decode(data: &[u8]) -> Result<Self, PoolError> {
        let call = IYieldPool::IYieldPoolCalls::abi_decode(data)
            .map_err(|e| PoolError::Encoding(format!("invalid pool calldata: {e}")))?;

        match call {
            IYieldPool::IYieldPoolCalls::deposit(c) => Ok(Self::Deposit { amount: c.amount }),
            IYieldPool::IYieldPoolCalls::withdraw(c) => Ok(Self::Withdraw { amount: c.amount }),
            IYieldPool::IYieldPoolCalls::claimRewards(_) => Ok(Self::ClaimRewards),
            _ => Err(PoolError::Encoding(
                "calldata targets a view function, not a pool operation".to_string(),
            )),
        }
    }
}

/// Decode the `uint256` returned by a pool view function
pub fn decode_uint_return<C>(data: &[u8]) -> Result<U256, PoolError>
where
    C: SolCall<Return = U256>,
{
    C::abi_decode_returns(data)
        .map_err(|e| PoolError::Encoding(format!("failed to decode {} return: {e}", C::SIGNATURE)))
}
