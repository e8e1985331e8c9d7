//! Key and signature wrappers.
//!
//! Thin newtypes over ed25519 keys so the rest of the workspace never touches
//! the curve library directly. Signing always goes through a domain tag to
//! prevent cross-protocol replay.

use crate::address::Address;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;

/// Domain tag for action envelope signatures.
pub const DOMAIN_ACTION: &[u8] = b"kestrel.action.v1";

/// Domain tag for consensus endorsement signatures.
pub const DOMAIN_ENDORSEMENT: &[u8] = b"kestrel.endorsement.v1";

/// Errors from decoding key material.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid public key bytes")]
    InvalidPublicKey,
}

/// Ed25519 signing key pair.
#[derive(Clone)]
pub struct KeyPair {
    signing: SigningKey,
}

impl KeyPair {
    /// Generate a fresh random key pair.
    pub fn generate() -> Self {
        Self {
            signing: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic key pair from a 32-byte seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing: SigningKey::from_bytes(&seed),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing.verifying_key())
    }

    /// Address of this key pair's public key.
    pub fn address(&self) -> Address {
        Address::from_public_key(&self.public_key())
    }

    /// Sign a message under a domain tag.
    pub fn sign(&self, domain: &[u8], message: &[u8]) -> Signature {
        let mut tagged = Vec::with_capacity(domain.len() + message.len());
        tagged.extend_from_slice(domain);
        tagged.extend_from_slice(message);
        Signature(self.signing.sign(&tagged))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, KeyError> {
        VerifyingKey::from_bytes(bytes)
            .map(PublicKey)
            .map_err(|_| KeyError::InvalidPublicKey)
    }

    /// Verify a signature over a domain-tagged message.
    pub fn verify(&self, domain: &[u8], message: &[u8], signature: &Signature) -> bool {
        let mut tagged = Vec::with_capacity(domain.len() + message.len());
        tagged.extend_from_slice(domain);
        tagged.extend_from_slice(message);
        self.0.verify_strict(&tagged, &signature.0).is_ok()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}..)", hex::encode(&self.to_bytes()[..4]))
    }
}

/// Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(ed25519_dalek::Signature);

impl Signature {
    /// All-zero signature, for test fixtures that never verify.
    pub fn zero() -> Self {
        Signature(ed25519_dalek::Signature::from_bytes(&[0u8; 64]))
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        self.0.to_bytes()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}..)", hex::encode(&self.to_bytes()[..4]))
    }
}
