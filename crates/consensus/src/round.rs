//! Delegate list management and proposer selection.

use crate::epoch::EpochSchedule;
use crate::error::ConsensusError;
use kestrel_types::{Address, Block, ChainManager};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// The active epoch view: delegate list, rotation mode, and the proposer
/// calculator.
///
/// Every node must select the same proposer for a given (height, time) pair,
/// so the calculation uses only consensus data: the delegate list, the
/// previous block header, and the genesis timing constants.
pub struct EpochManager {
    chain: Arc<dyn ChainManager>,
    schedule: EpochSchedule,
    delegates: Vec<Address>,
    is_time_based_rotation: bool,
}

impl EpochManager {
    pub fn new(
        chain: Arc<dyn ChainManager>,
        schedule: EpochSchedule,
        delegates: Vec<Address>,
        is_time_based_rotation: bool,
    ) -> Self {
        Self {
            chain,
            schedule,
            delegates,
            is_time_based_rotation,
        }
    }

    /// Whether an address is in the active delegate list.
    pub fn is_delegate(&self, addr: &Address) -> bool {
        self.delegates.iter().any(|delegate| delegate == addr)
    }

    pub fn delegates(&self) -> &[Address] {
        &self.delegates
    }

    /// The block producer of the round at `(height, round_start_time)`.
    ///
    /// The base index is the height; with time-based rotation enabled, the
    /// round number computed from clock drift shifts the index forward so a
    /// stalled proposer is rotated past.
    pub fn proposer(
        &self,
        height: u64,
        round_start_time: Duration,
    ) -> Result<Address, ConsensusError> {
        if self.delegates.is_empty() {
            return Err(ConsensusError::EmptyDelegateList);
        }
        let mut idx = height;
        if self.is_time_based_rotation {
            let genesis = self.chain.genesis();
            let round_num = self.round_num(
                height,
                genesis.block_interval(height),
                round_start_time,
                genesis.tolerated_overtime,
            )?;
            idx += u64::from(round_num);
        }
        Ok(self.delegates[(idx % self.delegates.len() as u64) as usize])
    }

    /// Round number from clock drift since the previous block.
    ///
    /// The previous block's time is truncated to a block-interval boundary
    /// past genesis, so replicas whose headers carry slightly-late timestamps
    /// still agree on the round grid.
    fn round_num(
        &self,
        height: u64,
        block_interval: Duration,
        now: Duration,
        tolerated_overtime: Duration,
    ) -> Result<u32, ConsensusError> {
        let genesis = self.chain.genesis();
        let mut last_block_time = genesis.timestamp;
        if height > 1 {
            if !genesis.is_bering(height) {
                return Err(ConsensusError::BeringNotActive(height));
            }
            let header = self.chain.header_by_height(height - 1)?;
            let since_genesis = header
                .timestamp
                .saturating_sub(genesis.timestamp)
                .as_millis();
            let interval = block_interval.as_millis();
            let truncated = since_genesis / interval * interval;
            last_block_time = genesis.timestamp + Duration::from_millis(truncated as u64);
        }
        if last_block_time >= now {
            return Err(ConsensusError::InvalidCurrentTime {
                last: last_block_time,
                now,
            });
        }
        let duration = now - last_block_time;
        let mut round_num: u32 = 0;
        if duration > block_interval {
            round_num = (duration.as_millis() / block_interval.as_millis()) as u32;
            if tolerated_overtime.is_zero()
                || duration.as_millis() % block_interval.as_millis()
                    < tolerated_overtime.as_millis()
            {
                round_num -= 1;
            }
        }
        Ok(round_num)
    }

    /// Refresh the delegate list from the last block of an epoch. A no-op at
    /// any other height.
    ///
    /// The declared list must carry exactly the scheduled number of
    /// delegates; a block violating that is rejected.
    pub fn update_with(&mut self, block: &Block) -> Result<(), ConsensusError> {
        if !self.schedule.is_epoch_last(block.height()) {
            return Ok(());
        }
        let delegates = block
            .header
            .delegates
            .as_ref()
            .ok_or(ConsensusError::MissingDelegateList)?;
        if delegates.len() as u64 != self.schedule.num_delegates() {
            return Err(ConsensusError::InvalidDelegateList {
                expected: self.schedule.num_delegates(),
                got: delegates.len() as u64,
            });
        }
        debug!(
            height = block.height(),
            delegates = delegates.len(),
            "delegate list refreshed at epoch boundary"
        );
        self.delegates = delegates.clone();
        Ok(())
    }
}
