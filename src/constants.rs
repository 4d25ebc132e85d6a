//! Constants and precision values for the yield pool SDK

use alloy::primitives::U256;
use std::time::Duration;

/// Pool and reward tokens use 18 decimals
pub const TOKEN_DECIMALS: u8 = 18;

/// APY is reported in basis points (2 decimals of a percentage)
/// e.g., 15% APY = 1500
pub const APY_DECIMALS: u8 = 2;

/// Chain ID used when none is configured (Ethereum mainnet)
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// Gas limit multiplier meaning "use the estimate as-is"
pub const GAS_MULTIPLIER_BASE_BPS: u64 = 10_000;

/// First receipt poll delay
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Longest delay between receipt polls once backoff kicks in
pub const DEFAULT_MAX_POLL_INTERVAL: Duration = Duration::from_secs(8);

/// How long `wait_for_transaction` waits when the caller gives no deadline
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Per-request RPC timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Scale a floating point value to U256 with specified decimals
///
/// Values are split into whole and fractional parts so 18-decimal tokens do
/// not overflow `u128` for realistic amounts.
pub fn scale_to_decimals(value: f64, decimals: u8) -> U256 {
    let whole = value.trunc();
    let fraction = value - whole;
    let unit = U256::from(10u64).pow(U256::from(decimals));
    let fraction_scaled = (fraction * 10f64.powi(decimals as i32)).round() as u128;
    U256::from(whole as u128) * unit + U256::from(fraction_scaled)
}

/// Unscale a U256 value to floating point with specified decimals
pub fn unscale_from_decimals(value: U256, decimals: u8) -> f64 {
    let unit = U256::from(10u64).pow(U256::from(decimals));
    let whole: u128 = (value / unit).try_into().unwrap_or(u128::MAX);
    let fraction: u128 = (value % unit).try_into().unwrap_or(0);
    whole as f64 + fraction as f64 / 10f64.powi(decimals as i32)
}

/// Scale a token amount (18 decimals)
pub fn scale_token(amount: f64) -> U256 {
    scale_to_decimals(amount, TOKEN_DECIMALS)
}

/// Like [`scale_to_decimals`], but `None` for negative, non-finite or
/// out-of-range values instead of saturating
pub fn checked_scale_to_decimals(value: f64, decimals: u8) -> Option<U256> {
    // u128::MAX as f64 rounds up to 2^128, so the bound is exclusive
    if !value.is_finite() || value < 0.0 || value >= u128::MAX as f64 {
        return None;
    }
    Some(scale_to_decimals(value, decimals))
}

/// Checked token amount (18 decimals)
pub fn checked_scale_token(amount: f64) -> Option<U256> {
    checked_scale_to_decimals(amount, TOKEN_DECIMALS)
}
