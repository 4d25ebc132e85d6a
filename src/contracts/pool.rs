//! Yield pool contract bindings

use alloy::sol;

sol! {
    /// Single-asset staking pool paying a reward token
    interface IYieldPool {
        // State-changing functions

        /// Stake `amount` tokens
        function deposit(uint256 amount) external;

        /// Unstake `amount` tokens
        function withdraw(uint256 amount) external;

        /// Transfer accrued rewards to the caller
        function claimRewards() external;

        // Views

        /// Total staked tokens
        function totalValueLocked() external view returns (uint256);

        /// Current APY in basis points
        function getCurrentAPY() external view returns (uint256);

        /// Reward tokens emitted per second
        function rewardRate() external view returns (uint256);

        /// Timestamp of the last reward accrual
        function lastUpdateTime() external view returns (uint256);

        /// Staked balance of `account`
        function balanceOf(address account) external view returns (uint256);

        /// Unclaimed rewards of `account`
        function pendingRewards(address account) external view returns (uint256);
    }
}
