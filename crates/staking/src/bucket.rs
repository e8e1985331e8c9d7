//! Staking buckets.

use kestrel_types::Address;
use num_bigint::BigUint;
use std::time::Duration;

/// A staked deposit tied to a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Global bucket index, unique and stable for the bucket's lifetime.
    pub index: u64,
    /// Owner address of the candidate this bucket votes for.
    pub candidate: Address,
    /// Account that owns the deposit.
    pub owner: Address,
    pub staked_amount: BigUint,
    /// Committed stake duration in days.
    pub staked_duration_days: u32,
    /// Whether the bucket re-stakes automatically at expiry.
    pub auto_stake: bool,
    /// Set once unstaking has begun; such buckets carry no vote weight.
    pub unstake_start: Option<Duration>,
}

impl Bucket {
    pub fn is_unstaked(&self) -> bool {
        self.unstake_start.is_some()
    }
}
