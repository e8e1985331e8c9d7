//! Consensus validation errors.

use kestrel_types::{Address, ChainError};
use std::time::Duration;
use thiserror::Error;

/// Errors from proposer calculation and footer validation. All of these
/// reject the block (or the round attempt) without mutating state.
#[derive(Debug, Error)]
pub enum ConsensusError {
    /// An endorsement signature does not bind its endorser, topic, and block
    /// hash.
    #[error("invalid endorsement for the vote")]
    InvalidEndorsement,

    /// An endorsement references a block hash that was never added.
    #[error("the endorsed block has not been received")]
    BlockNotReceived,

    /// Commit endorsements do not reach the 2/3 supermajority.
    #[error("insufficient commit endorsements: {commits} of {delegates} delegates")]
    InsufficientEndorsements { commits: usize, delegates: usize },

    /// The block producer is not the proposer of its (height, time) round.
    #[error("block producer {0} is not the round proposer")]
    InvalidProposer(Address),

    /// The block producer is not in the active delegate list.
    #[error("block producer {0} is not an active delegate")]
    NotADelegate(Address),

    /// The previous block's truncated time is not before the round time.
    /// The local clock may be behind; callers can retry after clock sync.
    #[error("last block time {last:?} is not before current time {now:?}")]
    InvalidCurrentTime { last: Duration, now: Duration },

    /// Time-based rotation is gated on the Bering hard fork.
    #[error("time-based rotation is unsupported before the bering fork (height {0})")]
    BeringNotActive(u64),

    /// An epoch-last block declared a delegate list of the wrong size.
    #[error("declared delegate list has {got} entries, expected {expected}")]
    InvalidDelegateList { expected: u64, got: u64 },

    /// An epoch-last block is missing its delegate list.
    #[error("epoch-last block is missing its delegate list")]
    MissingDelegateList,

    /// The active delegate list is empty; no proposer can be selected.
    #[error("delegate list is empty")]
    EmptyDelegateList,

    #[error(transparent)]
    Chain(#[from] ChainError),
}
