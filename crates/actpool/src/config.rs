//! Pool configuration.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the action pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActPoolConfig {
    /// How long an admitted action may wait before the timeout sweep evicts
    /// it. Zero disables expiry.
    pub ttl: Duration,
    /// Admission floor for gas prices.
    pub min_gas_price: BigUint,
    /// Capacity cap per account queue.
    pub max_actions_per_account: u64,
    /// Capacity cap across the whole pool.
    pub max_actions_total: u64,
}

impl Default for ActPoolConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            min_gas_price: BigUint::from(1_000_000_000_000u64),
            max_actions_per_account: 100,
            max_actions_total: 32_000,
        }
    }
}

impl ActPoolConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_min_gas_price(mut self, min_gas_price: BigUint) -> Self {
        self.min_gas_price = min_gas_price;
        self
    }

    pub fn with_max_actions_per_account(mut self, max: u64) -> Self {
        self.max_actions_per_account = max;
        self
    }

    pub fn with_max_actions_total(mut self, max: u64) -> Self {
        self.max_actions_total = max;
        self
    }
}
