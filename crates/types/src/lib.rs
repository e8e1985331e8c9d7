//! Core types for the kestrel transactional core.
//!
//! This crate provides the foundational types used throughout the node's
//! transactional subsystems:
//!
//! - **Primitives**: [`Hash`], addresses, key and signature wrappers
//! - **Actions**: [`SignedAction`] envelopes and their payload kinds
//! - **Consensus types**: [`Block`], [`BlockHeader`], [`Endorsement`]
//! - **Oracle traits**: [`AccountStateReader`], [`ChainManager`]
//!
//! # Design Philosophy
//!
//! This crate is self-contained with minimal dependencies. It does not depend
//! on any other workspace crates, making it the foundation layer. The oracle
//! traits live here so that every subsystem can consume them without knowing
//! who implements them.

mod action;
mod address;
mod block;
mod crypto;
mod endorsement;
mod genesis;
mod hash;
mod provider;

pub use action::{ActionPayload, SignedAction, StakingCommand};
pub use address::Address;
pub use block::{Block, BlockHeader};
pub use crypto::{KeyError, KeyPair, PublicKey, Signature, DOMAIN_ACTION, DOMAIN_ENDORSEMENT};
pub use endorsement::{ConsensusVote, Endorsement, Topic};
pub use genesis::Genesis;
pub use hash::{Hash, HexError};
pub use provider::{AccountState, AccountStateReader, ChainError, ChainManager, StateError};

/// Test utilities.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils {
    use super::*;
    use num_bigint::BigUint;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// Deterministic key pair for tests, derived from a seed byte.
    pub fn test_keypair(seed: u8) -> KeyPair {
        KeyPair::from_seed([seed; 32])
    }

    /// Address of the deterministic test key pair for a seed byte.
    pub fn test_address(seed: u8) -> Address {
        test_keypair(seed).address()
    }

    /// In-memory account state oracle.
    #[derive(Default)]
    pub struct InMemoryState {
        accounts: RwLock<HashMap<Address, AccountState>>,
        unavailable: RwLock<bool>,
    }

    impl InMemoryState {
        pub fn new() -> Self {
            Self::default()
        }

        /// Set the committed nonce and balance for an account.
        pub fn set_account(&self, addr: Address, nonce: u64, balance: BigUint) {
            self.accounts
                .write()
                .unwrap()
                .insert(addr, AccountState { nonce, balance });
        }

        /// Make every lookup fail, simulating an oracle outage.
        pub fn set_unavailable(&self, unavailable: bool) {
            *self.unavailable.write().unwrap() = unavailable;
        }
    }

    impl AccountStateReader for InMemoryState {
        fn account_state(&self, addr: &Address) -> Result<AccountState, StateError> {
            if *self.unavailable.read().unwrap() {
                return Err(StateError::Unavailable("oracle offline".into()));
            }
            self.accounts
                .read()
                .unwrap()
                .get(addr)
                .cloned()
                .ok_or(StateError::NotFound)
        }
    }

    /// In-memory block header oracle.
    pub struct InMemoryChain {
        genesis: Genesis,
        headers: RwLock<HashMap<u64, BlockHeader>>,
    }

    impl InMemoryChain {
        pub fn new(genesis: Genesis) -> Self {
            Self {
                genesis,
                headers: RwLock::new(HashMap::new()),
            }
        }

        pub fn insert_header(&self, header: BlockHeader) {
            self.headers.write().unwrap().insert(header.height, header);
        }
    }

    impl ChainManager for InMemoryChain {
        fn genesis(&self) -> &Genesis {
            &self.genesis
        }

        fn header_by_height(&self, height: u64) -> Result<BlockHeader, ChainError> {
            self.headers
                .read()
                .unwrap()
                .get(&height)
                .cloned()
                .ok_or(ChainError::HeightNotFound(height))
        }
    }
}
