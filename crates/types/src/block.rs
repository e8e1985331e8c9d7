//! Blocks and block headers.

use crate::action::SignedAction;
use crate::address::Address;
use crate::endorsement::Endorsement;
use crate::hash::Hash;
use std::time::Duration;

/// Consensus metadata for a block.
///
/// `delegates` is populated only on the last block of an epoch, where the
/// producer declares the delegate list for the next epoch.
#[derive(Debug, Clone)]
pub struct BlockHeader {
    pub height: u64,
    /// Block time as an offset from the unix epoch.
    pub timestamp: Duration,
    pub producer: Address,
    pub prev_hash: Hash,
    pub delegates: Option<Vec<Address>>,
}

impl BlockHeader {
    /// Content hash of the header.
    pub fn hash(&self) -> Hash {
        let mut buf = Vec::new();
        buf.extend_from_slice(&self.height.to_be_bytes());
        buf.extend_from_slice(&(self.timestamp.as_millis() as u64).to_be_bytes());
        buf.extend_from_slice(self.producer.as_bytes());
        buf.extend_from_slice(self.prev_hash.as_bytes());
        if let Some(delegates) = &self.delegates {
            buf.extend_from_slice(&(delegates.len() as u32).to_be_bytes());
            for delegate in delegates {
                buf.extend_from_slice(delegate.as_bytes());
            }
        }
        Hash::from_bytes(&buf)
    }
}

/// A full block: header, action payload, and the endorsement footer that
/// finalized it.
#[derive(Debug, Clone)]
pub struct Block {
    pub header: BlockHeader,
    pub actions: Vec<SignedAction>,
    pub endorsements: Vec<Endorsement>,
}

impl Block {
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    pub fn height(&self) -> u64 {
        self.header.height
    }

    pub fn timestamp(&self) -> Duration {
        self.header.timestamp
    }

    pub fn producer(&self) -> Address {
        self.header.producer
    }

    pub fn endorsements(&self) -> &[Endorsement] {
        &self.endorsements
    }
}
