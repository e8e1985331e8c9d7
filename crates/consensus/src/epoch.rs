//! Roll-DPoS epoch arithmetic.

use kestrel_types::Genesis;

/// Epoch sizing: every epoch spans `num_delegates * num_subepochs` blocks,
/// all sharing one delegate list. Height 0 is the genesis block and belongs
/// to epoch 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochSchedule {
    num_delegates: u64,
    num_subepochs: u64,
}

impl EpochSchedule {
    pub fn new(num_delegates: u64, num_subepochs: u64) -> Self {
        Self {
            num_delegates,
            num_subepochs,
        }
    }

    pub fn from_genesis(genesis: &Genesis) -> Self {
        Self::new(genesis.num_delegates, genesis.num_subepochs)
    }

    pub fn num_delegates(&self) -> u64 {
        self.num_delegates
    }

    fn epoch_len(&self) -> u64 {
        self.num_delegates * self.num_subepochs
    }

    /// Epoch a height belongs to.
    pub fn epoch_num(&self, height: u64) -> u64 {
        if height == 0 {
            return 0;
        }
        (height - 1) / self.epoch_len() + 1
    }

    /// Last block height of an epoch.
    pub fn epoch_last_height(&self, epoch: u64) -> u64 {
        epoch * self.epoch_len()
    }

    /// Whether a height is the last block of its epoch.
    pub fn is_epoch_last(&self, height: u64) -> bool {
        height == self.epoch_last_height(self.epoch_num(height))
    }
}
