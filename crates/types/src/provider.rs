//! Oracle traits consumed by the transactional core.
//!
//! The core never owns persistence. Account state, block headers, and genesis
//! parameters come from the chain service through these seams; tests plug in
//! the in-memory implementations from [`crate::test_utils`].

use crate::address::Address;
use crate::block::BlockHeader;
use crate::genesis::Genesis;
use num_bigint::BigUint;
use thiserror::Error;

/// Committed state of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountState {
    /// Last nonce applied to committed state.
    pub nonce: u64,
    /// Spendable balance at that nonce.
    pub balance: BigUint,
}

/// Errors from the account state oracle.
#[derive(Debug, Error)]
pub enum StateError {
    /// The account has no committed state yet.
    #[error("account not found")]
    NotFound,
    /// The oracle could not serve the lookup.
    #[error("account state unavailable: {0}")]
    Unavailable(String),
}

/// Account state oracle: nonce and balance lookups by address.
pub trait AccountStateReader: Send + Sync {
    fn account_state(&self, addr: &Address) -> Result<AccountState, StateError>;
}

/// Errors from the block oracle.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("no block header at height {0}")]
    HeightNotFound(u64),
    #[error("chain unavailable: {0}")]
    Unavailable(String),
}

/// Block header and genesis oracle.
pub trait ChainManager: Send + Sync {
    fn genesis(&self) -> &Genesis;

    fn header_by_height(&self, height: u64) -> Result<BlockHeader, ChainError>;
}
