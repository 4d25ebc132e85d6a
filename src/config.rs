//! Network configuration for the yield pool SDK

use crate::constants::{
    DEFAULT_CHAIN_ID, DEFAULT_CONFIRMATION_TIMEOUT, DEFAULT_MAX_POLL_INTERVAL,
    DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT, GAS_MULTIPLIER_BASE_BPS,
};
use alloy::primitives::{address, Address};
use eyre::{Context, Result};
use std::str::FromStr;
use std::time::Duration;

/// Receipt polling settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationConfig {
    /// Delay before the second receipt poll
    pub poll_interval: Duration,
    /// Cap for the doubling poll delay (equal to `poll_interval` for fixed polling)
    pub max_poll_interval: Duration,
    /// Deadline applied when the caller's context has none
    pub timeout: Duration,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_interval: DEFAULT_MAX_POLL_INTERVAL,
            timeout: DEFAULT_CONFIRMATION_TIMEOUT,
        }
    }
}

/// Network configuration: chain, RPC endpoint and pool contract
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Chain ID every transaction is signed for
    pub chain_id: u64,
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Yield pool contract address
    pub pool: Address,
    /// Receipt polling
    pub confirmation: ConfirmationConfig,
    /// Timeout for a single RPC request
    pub request_timeout: Duration,
    /// Gas estimate padding in basis points (10_000 = none)
    pub gas_limit_multiplier_bps: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::new(
            "http://localhost:8545",
            address!("1234567890123456789012345678901234567890"),
        )
    }
}

impl NetworkConfig {
    /// Mainnet configuration for the pool at `pool`
    pub fn new(rpc_url: impl Into<String>, pool: Address) -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            rpc_url: rpc_url.into(),
            pool,
            confirmation: ConfirmationConfig::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            gas_limit_multiplier_bps: GAS_MULTIPLIER_BASE_BPS,
        }
    }

    /// Load configuration from the environment (and `.env` if present)
    ///
    /// Required: `RPC_URL`, `POOL_ADDRESS`. Optional: `CHAIN_ID`,
    /// `CONFIRMATION_TIMEOUT_SECS`, `POLL_INTERVAL_MS`, `GAS_LIMIT_MULTIPLIER_BPS`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let rpc_url =
            std::env::var("RPC_URL").context("RPC_URL environment variable must be set")?;
        let pool = env_parse::<Address>("POOL_ADDRESS")?
            .ok_or_else(|| eyre::eyre!("POOL_ADDRESS environment variable must be set"))?;

        let mut config = Self::new(rpc_url, pool);

        if let Some(chain_id) = env_parse("CHAIN_ID")? {
            config = config.with_chain_id(chain_id);
        }
        if let Some(secs) = env_parse("CONFIRMATION_TIMEOUT_SECS")? {
            config.confirmation.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = env_parse("POLL_INTERVAL_MS")? {
            let interval = Duration::from_millis(ms);
            config.confirmation.poll_interval = interval;
            config.confirmation.max_poll_interval =
                config.confirmation.max_poll_interval.max(interval);
        }
        if let Some(bps) = env_parse("GAS_LIMIT_MULTIPLIER_BPS")? {
            config = config.with_gas_limit_multiplier(bps);
        }

        Ok(config)
    }

    /// Set the chain ID
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Create custom configuration with specific RPC URL
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    /// Set the pool address
    pub fn with_pool(mut self, pool: Address) -> Self {
        self.pool = pool;
        self
    }

    /// Set receipt polling
    pub fn with_confirmation(mut self, confirmation: ConfirmationConfig) -> Self {
        self.confirmation = confirmation;
        self
    }

    /// Set the per-request RPC timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Pad gas estimates, e.g. 12_000 for +20%
    pub fn with_gas_limit_multiplier(mut self, bps: u64) -> Self {
        self.gas_limit_multiplier_bps = bps;
        self
    }
}

/// Parse an optional environment variable
fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| eyre::eyre!("Invalid {}: {}", name, e)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", name)),
    }
}
