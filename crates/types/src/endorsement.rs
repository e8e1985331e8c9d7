//! Consensus vote endorsements.
//!
//! A delegate endorses a `(block hash, topic)` pair by signing it. The
//! signature binds the endorser key, the topic, and the block hash, so an
//! endorsement for one block or one phase can never be replayed for another.

use crate::address::Address;
use crate::crypto::{KeyPair, PublicKey, Signature, DOMAIN_ENDORSEMENT};
use crate::hash::Hash;
use std::time::Duration;

/// Consensus vote topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Topic {
    Proposal,
    Lock,
    Commit,
}

impl Topic {
    fn tag(self) -> u8 {
        match self {
            Topic::Proposal => 0,
            Topic::Lock => 1,
            Topic::Commit => 2,
        }
    }
}

/// The message a delegate endorses: a block hash under a vote topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsensusVote {
    block_hash: Hash,
    topic: Topic,
}

impl ConsensusVote {
    pub fn new(block_hash: Hash, topic: Topic) -> Self {
        Self { block_hash, topic }
    }

    pub fn block_hash(&self) -> Hash {
        self.block_hash
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    fn signing_bytes(&self) -> [u8; 33] {
        let mut buf = [0u8; 33];
        buf[..32].copy_from_slice(self.block_hash.as_bytes());
        buf[32] = self.topic.tag();
        buf
    }
}

/// A signed endorsement of a [`ConsensusVote`].
#[derive(Debug, Clone)]
pub struct Endorsement {
    endorser: Address,
    endorser_key: PublicKey,
    timestamp: Duration,
    signature: Signature,
}

impl Endorsement {
    /// Endorse a vote with the given key.
    pub fn sign(vote: &ConsensusVote, key: &KeyPair, timestamp: Duration) -> Self {
        Self {
            endorser: key.address(),
            endorser_key: key.public_key(),
            timestamp,
            signature: key.sign(DOMAIN_ENDORSEMENT, &vote.signing_bytes()),
        }
    }

    /// Verify this endorsement against a vote: the signature must check out
    /// under the endorser's key, and the endorser address must match that key.
    pub fn verify(&self, vote: &ConsensusVote) -> bool {
        Address::from_public_key(&self.endorser_key) == self.endorser
            && self
                .endorser_key
                .verify(DOMAIN_ENDORSEMENT, &vote.signing_bytes(), &self.signature)
    }

    pub fn endorser(&self) -> Address {
        self.endorser
    }

    pub fn timestamp(&self) -> Duration {
        self.timestamp
    }
}
