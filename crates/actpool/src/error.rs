//! Admission errors.

use kestrel_types::{Hash, StateError};
use thiserror::Error;

/// Errors reported to the ingest path. None of these are fatal to the pool.
#[derive(Debug, Error)]
pub enum ActPoolError {
    /// An action already occupies this nonce at an equal or higher gas price.
    #[error("replacement action underpriced")]
    ReplaceUnderpriced,

    /// The action's nonce is not above the account's confirmed nonce.
    #[error("nonce {nonce} is not above confirmed nonce {confirmed}")]
    NonceTooLow { nonce: u64, confirmed: u64 },

    /// The sender's balance snapshot cannot cover the action's cost.
    #[error("insufficient balance for action cost")]
    InsufficientBalance,

    /// The sender's queue is at its capacity cap.
    #[error("account queue is full")]
    QueueFull,

    /// The pool is at its global capacity cap.
    #[error("action pool is full")]
    PoolFull,

    /// The envelope signature does not verify.
    #[error("invalid action signature")]
    InvalidSignature,

    /// The gas price is below the configured admission floor.
    #[error("gas price below the configured floor")]
    GasPriceBelowFloor,

    /// An identical action (by content hash) is already pooled.
    #[error("action {0} already exists in the pool")]
    DuplicateAction(Hash),

    /// The account state oracle failed the admission lookup.
    #[error(transparent)]
    State(#[from] StateError),
}
