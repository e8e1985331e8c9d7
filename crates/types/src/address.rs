//! Account addresses.

use crate::crypto::PublicKey;
use crate::hash::{Hash, HexError};
use std::fmt;
use std::str::FromStr;

/// 20-byte account address.
///
/// Derived from the blake3 hash of the account public key. The `Ord`
/// implementation gives the canonical address order used for deterministic
/// iteration and for lock ordering across accounts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    pub const LEN: usize = 20;

    /// The all-zero address.
    pub const ZERO: Self = Address([0u8; 20]);

    /// Derive the address of a public key.
    pub fn from_public_key(key: &PublicKey) -> Self {
        let digest = Hash::from_bytes(&key.to_bytes());
        let mut raw = [0u8; Self::LEN];
        raw.copy_from_slice(&digest.as_bytes()[..Self::LEN]);
        Address(raw)
    }

    /// Wrap raw address bytes.
    pub fn from_raw(raw: [u8; 20]) -> Self {
        Address(raw)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}..)", hex::encode(&self.0[..4]))
    }
}

impl FromStr for Address {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let raw: [u8; 20] = bytes.try_into().map_err(|v: Vec<u8>| HexError::Length {
            expected: Address::LEN,
            got: v.len(),
        })?;
        Ok(Address(raw))
    }
}
