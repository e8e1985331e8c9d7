//! Endorsement bookkeeping per block hash.

use crate::error::ConsensusError;
use kestrel_types::{Address, Block, ConsensusVote, Endorsement, Hash, Topic};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Endorsements collected for one block, keyed by topic then endorser.
///
/// Keying by endorser makes re-adding idempotent: a delegate contributes at
/// most one endorsement per topic no matter how often it is gossiped.
#[derive(Debug, Default)]
struct BlockEndorsements {
    block: Option<Block>,
    by_topic: BTreeMap<Topic, BTreeMap<Address, Endorsement>>,
}

/// Validation-scoped endorsement collection over block hashes.
#[derive(Debug, Default)]
pub struct EndorsementCollection {
    collections: HashMap<Hash, BlockEndorsements>,
}

impl EndorsementCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block so endorsements for its hash can be accepted.
    pub fn add_block(&mut self, block: Block) {
        let entry = self.collections.entry(block.hash()).or_default();
        entry.block = Some(block);
    }

    /// Verify and record an endorsement of a vote.
    ///
    /// Fails with [`ConsensusError::InvalidEndorsement`] if the signature does
    /// not bind the endorser to the vote, and with
    /// [`ConsensusError::BlockNotReceived`] if the voted block was never
    /// added.
    pub fn add_vote_endorsement(
        &mut self,
        vote: &ConsensusVote,
        endorsement: Endorsement,
    ) -> Result<(), ConsensusError> {
        if !endorsement.verify(vote) {
            return Err(ConsensusError::InvalidEndorsement);
        }
        let entry = self
            .collections
            .get_mut(&vote.block_hash())
            .ok_or(ConsensusError::BlockNotReceived)?;
        entry
            .by_topic
            .entry(vote.topic())
            .or_default()
            .insert(endorsement.endorser(), endorsement);
        Ok(())
    }

    /// Count the distinct endorsers of a block across the given topics.
    pub fn count(&self, block_hash: &Hash, topics: &[Topic]) -> usize {
        let Some(entry) = self.collections.get(block_hash) else {
            return 0;
        };
        let mut endorsers: BTreeSet<Address> = BTreeSet::new();
        for topic in topics {
            if let Some(by_endorser) = entry.by_topic.get(topic) {
                endorsers.extend(by_endorser.keys().copied());
            }
        }
        endorsers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_types::test_utils::test_keypair;
    use kestrel_types::{BlockHeader, Hash};
    use std::time::Duration;

    fn block() -> Block {
        Block {
            header: BlockHeader {
                height: 3,
                timestamp: Duration::from_secs(30),
                producer: test_keypair(1).address(),
                prev_hash: Hash::ZERO,
                delegates: None,
            },
            actions: Vec::new(),
            endorsements: Vec::new(),
        }
    }

    #[test]
    fn test_endorsement_requires_the_block_first() {
        let mut collection = EndorsementCollection::new();
        let vote = ConsensusVote::new(block().hash(), Topic::Commit);
        let en = Endorsement::sign(&vote, &test_keypair(2), Duration::ZERO);
        let err = collection.add_vote_endorsement(&vote, en).unwrap_err();
        assert!(matches!(err, ConsensusError::BlockNotReceived));
    }

    #[test]
    fn test_invalid_signature_is_rejected() {
        let mut collection = EndorsementCollection::new();
        let blk = block();
        collection.add_block(blk.clone());

        // Endorsement signed for a different block hash.
        let other_vote = ConsensusVote::new(Hash::from_bytes(b"other"), Topic::Commit);
        let en = Endorsement::sign(&other_vote, &test_keypair(2), Duration::ZERO);

        let vote = ConsensusVote::new(blk.hash(), Topic::Commit);
        let err = collection.add_vote_endorsement(&vote, en).unwrap_err();
        assert!(matches!(err, ConsensusError::InvalidEndorsement));
    }

    #[test]
    fn test_count_dedupes_by_endorser() {
        let mut collection = EndorsementCollection::new();
        let blk = block();
        collection.add_block(blk.clone());
        let vote = ConsensusVote::new(blk.hash(), Topic::Commit);

        let key = test_keypair(2);
        for _ in 0..3 {
            let en = Endorsement::sign(&vote, &key, Duration::ZERO);
            collection.add_vote_endorsement(&vote, en).unwrap();
        }
        assert_eq!(collection.count(&blk.hash(), &[Topic::Commit]), 1);

        let en = Endorsement::sign(&vote, &test_keypair(3), Duration::ZERO);
        collection.add_vote_endorsement(&vote, en).unwrap();
        assert_eq!(collection.count(&blk.hash(), &[Topic::Commit]), 2);
        // Other topics stay empty.
        assert_eq!(collection.count(&blk.hash(), &[Topic::Lock]), 0);
    }
}
