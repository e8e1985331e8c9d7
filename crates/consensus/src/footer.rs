//! Block producer and endorsement-footer validation.

use crate::endorsement_collection::EndorsementCollection;
use crate::error::ConsensusError;
use crate::round::EpochManager;
use kestrel_types::{Block, ConsensusVote, Topic};
use parking_lot::RwLock;
use std::sync::Arc;

/// Validates a produced block against the active epoch view: the producer
/// must be the proposer of its round, and the endorsement footer must carry
/// a strict 2/3 commit supermajority of the delegate list.
pub struct FooterValidator {
    manager: Arc<RwLock<EpochManager>>,
}

impl FooterValidator {
    pub fn new(manager: Arc<RwLock<EpochManager>>) -> Self {
        Self { manager }
    }

    /// Check the block's producer is an active delegate and is the proposer
    /// selected for `(block.height, block.timestamp)`.
    pub fn validate_block_producer(&self, block: &Block) -> Result<(), ConsensusError> {
        let producer = block.producer();
        let manager = self.manager.read();
        if !manager.is_delegate(&producer) {
            return Err(ConsensusError::NotADelegate(producer));
        }
        let proposer = manager.proposer(block.height(), block.timestamp())?;
        if proposer != producer {
            return Err(ConsensusError::InvalidProposer(producer));
        }
        Ok(())
    }

    /// Check the block's endorsement footer reaches the commit quorum:
    /// `3 * commits > 2 * delegates`, strictly.
    pub fn validate_block_vote(&self, block: &Block) -> Result<(), ConsensusError> {
        let mut round = EndorsementCollection::new();
        round.add_block(block.clone());

        let block_hash = block.hash();
        let vote = ConsensusVote::new(block_hash, Topic::Commit);
        for endorsement in block.endorsements() {
            round.add_vote_endorsement(&vote, endorsement.clone())?;
        }

        let commits = round.count(&block_hash, &[Topic::Commit]);
        let delegates = self.manager.read().delegates().len();
        if 3 * commits <= 2 * delegates {
            return Err(ConsensusError::InsufficientEndorsements { commits, delegates });
        }
        Ok(())
    }
}
