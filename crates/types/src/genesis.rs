//! Genesis and hard-fork configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chain genesis parameters.
///
/// Hard-fork heights gate consensus features: time-based proposer rotation is
/// only available from the Bering height, and the Dardanelles height switches
/// the chain to the shorter block interval. All fields are frozen per network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genesis {
    /// Genesis block time as an offset from the unix epoch.
    pub timestamp: Duration,
    /// Height at which the Bering feature set activates.
    pub bering_height: u64,
    /// Height at which the Dardanelles block interval takes effect.
    pub dardanelles_height: u64,
    /// Block interval before Dardanelles.
    pub block_interval: Duration,
    /// Block interval from the Dardanelles height on.
    pub dardanelles_block_interval: Duration,
    /// Round-drift tolerance for the proposer calculator.
    pub tolerated_overtime: Duration,
    /// Number of delegates elected per epoch.
    pub num_delegates: u64,
    /// Number of sub-epochs (production rotations) per epoch.
    pub num_subepochs: u64,
}

impl Genesis {
    pub fn is_bering(&self, height: u64) -> bool {
        height >= self.bering_height
    }

    pub fn is_dardanelles(&self, height: u64) -> bool {
        height >= self.dardanelles_height
    }

    /// Block interval in force at a height.
    pub fn block_interval(&self, height: u64) -> Duration {
        if self.is_dardanelles(height) {
            self.dardanelles_block_interval
        } else {
            self.block_interval
        }
    }
}

impl Default for Genesis {
    fn default() -> Self {
        Self {
            timestamp: Duration::ZERO,
            bering_height: 1,
            dardanelles_height: 1,
            block_interval: Duration::from_secs(10),
            dardanelles_block_interval: Duration::from_secs(5),
            tolerated_overtime: Duration::from_secs(2),
            num_delegates: 24,
            num_subepochs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_interval_switches_at_dardanelles() {
        let genesis = Genesis {
            dardanelles_height: 100,
            ..Genesis::default()
        };
        assert_eq!(genesis.block_interval(99), Duration::from_secs(10));
        assert_eq!(genesis.block_interval(100), Duration::from_secs(5));
    }

    #[test]
    fn test_bering_gate() {
        let genesis = Genesis {
            bering_height: 50,
            ..Genesis::default()
        };
        assert!(!genesis.is_bering(49));
        assert!(genesis.is_bering(50));
    }
}
