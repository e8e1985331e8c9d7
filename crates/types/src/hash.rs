//! Content hashing.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing a hex-encoded hash.
#[derive(Debug, Error, PartialEq)]
pub enum HexError {
    #[error("invalid hex encoding: {0}")]
    Encoding(#[from] hex::FromHexError),
    #[error("expected {expected} bytes, got {got}")]
    Length { expected: usize, got: usize },
}

/// 32-byte blake3 content hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; 32]);

impl Hash {
    /// The all-zero hash.
    pub const ZERO: Self = Hash([0u8; 32]);

    /// Hash arbitrary bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        Hash(*blake3::hash(data).as_bytes())
    }

    /// Wrap a raw 32-byte digest.
    pub fn from_raw(raw: [u8; 32]) -> Self {
        Hash(raw)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form keeps log lines readable.
        write!(f, "Hash({}..)", hex::encode(&self.0[..4]))
    }
}

impl FromStr for Hash {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let raw: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| HexError::Length {
            expected: 32,
            got: v.len(),
        })?;
        Ok(Hash(raw))
    }
}
