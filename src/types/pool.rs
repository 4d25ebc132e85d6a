//! Pool and position types for user-facing API

use crate::constants::{unscale_from_decimals, APY_DECIMALS, TOKEN_DECIMALS};
use alloy::primitives::U256;
use serde::Serialize;

/// Pool-wide statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolInfo {
    /// Total staked tokens (18 decimals)
    pub total_value_locked: U256,
    /// APY in basis points (1500 = 15%)
    pub current_apy: U256,
    /// Reward tokens emitted per second (18 decimals)
    pub reward_rate: U256,
    /// Unix timestamp of the last reward update
    pub last_update_time: U256,
}

impl PoolInfo {
    /// TVL as whole tokens
    pub fn tvl_tokens(&self) -> f64 {
        unscale_from_decimals(self.total_value_locked, TOKEN_DECIMALS)
    }

    /// APY as a percentage
    pub fn apy_percent(&self) -> f64 {
        unscale_from_decimals(self.current_apy, APY_DECIMALS)
    }
}

/// A user's stake in the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPosition {
    /// Staked tokens (18 decimals)
    pub staked_balance: U256,
    /// Unclaimed rewards (18 decimals)
    pub pending_rewards: U256,
    /// Unix timestamp of the last claim
    pub last_claim_time: U256,
    pub reward_debt: U256,
}

impl UserPosition {
    /// Staked balance as whole tokens
    pub fn staked_tokens(&self) -> f64 {
        unscale_from_decimals(self.staked_balance, TOKEN_DECIMALS)
    }

    /// Pending rewards as whole tokens
    pub fn pending_reward_tokens(&self) -> f64 {
        unscale_from_decimals(self.pending_rewards, TOKEN_DECIMALS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::scale_token;

    #[test]
    fn test_pool_info_units() {
        let info = PoolInfo {
            total_value_locked: scale_token(1000.0),
            current_apy: U256::from(1500u64),
            reward_rate: scale_token(1.0),
            last_update_time: U256::ZERO,
        };
        assert_eq!(info.tvl_tokens(), 1000.0);
        assert_eq!(info.apy_percent(), 15.0);
    }

    #[test]
    fn test_position_units() {
        let position = UserPosition {
            staked_balance: scale_token(10.0),
            pending_rewards: scale_token(0.5),
            last_claim_time: U256::ZERO,
            reward_debt: U256::ZERO,
        };
        assert_eq!(position.staked_tokens(), 10.0);
        assert_eq!(position.pending_reward_tokens(), 0.5);
    }
}
