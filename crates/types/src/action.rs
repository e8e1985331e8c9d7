//! Signed action envelopes.
//!
//! An action is the unit of admission for the pool: a transfer, a contract
//! execution, or a staking operation, wrapped in a nonce-bearing signed
//! envelope. Equality is by content hash, so two envelopes carrying the same
//! bytes are the same action regardless of how they arrived.

use crate::address::Address;
use crate::crypto::{KeyPair, PublicKey, Signature, DOMAIN_ACTION};
use crate::hash::Hash;
use num_bigint::BigUint;
use num_traits::Zero;

/// Staking operations routed through the action pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakingCommand {
    /// Create a new bucket staked to a candidate.
    CreateBucket {
        candidate: Address,
        amount: BigUint,
        duration_days: u32,
        auto_stake: bool,
    },
    /// Add funds to an existing bucket.
    DepositToBucket { bucket_index: u64, amount: BigUint },
    /// Begin unstaking a bucket.
    Unstake { bucket_index: u64 },
}

/// Action payload kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionPayload {
    /// Plain value transfer.
    Transfer {
        recipient: Address,
        amount: BigUint,
        payload: Vec<u8>,
    },
    /// Contract execution. `contract` is `None` for contract creation.
    Execution {
        contract: Option<Address>,
        amount: BigUint,
        data: Vec<u8>,
    },
    /// Staking operation.
    Staking(StakingCommand),
}

impl ActionPayload {
    /// Value moved out of the sender's account by this payload.
    pub fn transferred_amount(&self) -> BigUint {
        match self {
            ActionPayload::Transfer { amount, .. } => amount.clone(),
            ActionPayload::Execution { amount, .. } => amount.clone(),
            ActionPayload::Staking(StakingCommand::CreateBucket { amount, .. }) => amount.clone(),
            ActionPayload::Staking(StakingCommand::DepositToBucket { amount, .. }) => {
                amount.clone()
            }
            ActionPayload::Staking(StakingCommand::Unstake { .. }) => BigUint::zero(),
        }
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        match self {
            ActionPayload::Transfer {
                recipient,
                amount,
                payload,
            } => {
                buf.push(0);
                buf.extend_from_slice(recipient.as_bytes());
                encode_biguint(buf, amount);
                encode_bytes(buf, payload);
            }
            ActionPayload::Execution {
                contract,
                amount,
                data,
            } => {
                buf.push(1);
                match contract {
                    Some(addr) => {
                        buf.push(1);
                        buf.extend_from_slice(addr.as_bytes());
                    }
                    None => buf.push(0),
                }
                encode_biguint(buf, amount);
                encode_bytes(buf, data);
            }
            ActionPayload::Staking(cmd) => {
                buf.push(2);
                match cmd {
                    StakingCommand::CreateBucket {
                        candidate,
                        amount,
                        duration_days,
                        auto_stake,
                    } => {
                        buf.push(0);
                        buf.extend_from_slice(candidate.as_bytes());
                        encode_biguint(buf, amount);
                        buf.extend_from_slice(&duration_days.to_be_bytes());
                        buf.push(*auto_stake as u8);
                    }
                    StakingCommand::DepositToBucket {
                        bucket_index,
                        amount,
                    } => {
                        buf.push(1);
                        buf.extend_from_slice(&bucket_index.to_be_bytes());
                        encode_biguint(buf, amount);
                    }
                    StakingCommand::Unstake { bucket_index } => {
                        buf.push(2);
                        buf.extend_from_slice(&bucket_index.to_be_bytes());
                    }
                }
            }
        }
    }
}

fn encode_biguint(buf: &mut Vec<u8>, value: &BigUint) {
    let bytes = value.to_bytes_be();
    buf.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    buf.extend_from_slice(&bytes);
}

fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    buf.extend_from_slice(bytes);
}

/// A signed, nonce-bearing action envelope.
///
/// The content hash is computed once at construction and covers the full
/// envelope including the signature.
#[derive(Clone)]
pub struct SignedAction {
    sender: Address,
    sender_key: PublicKey,
    nonce: u64,
    gas_limit: u64,
    gas_price: BigUint,
    payload: ActionPayload,
    signature: Signature,
    hash: Hash,
}

impl SignedAction {
    /// Sign a new action envelope.
    pub fn sign(
        key: &KeyPair,
        nonce: u64,
        gas_limit: u64,
        gas_price: BigUint,
        payload: ActionPayload,
    ) -> Self {
        let sender_key = key.public_key();
        let body = signing_bytes(&sender_key, nonce, gas_limit, &gas_price, &payload);
        let signature = key.sign(DOMAIN_ACTION, &body);
        let hash = envelope_hash(&body, &signature);
        Self {
            sender: key.address(),
            sender_key,
            nonce,
            gas_limit,
            gas_price,
            payload,
            signature,
            hash,
        }
    }

    /// Check the envelope is well-formed: the signature verifies and the
    /// sender address matches the signing key.
    pub fn verify(&self) -> bool {
        if Address::from_public_key(&self.sender_key) != self.sender {
            return false;
        }
        let body = signing_bytes(
            &self.sender_key,
            self.nonce,
            self.gas_limit,
            &self.gas_price,
            &self.payload,
        );
        self.sender_key.verify(DOMAIN_ACTION, &body, &self.signature)
    }

    /// Maximum spend of this action: `gas_price * gas_limit` plus the
    /// transferred amount.
    pub fn cost(&self) -> BigUint {
        &self.gas_price * self.gas_limit + self.payload.transferred_amount()
    }

    pub fn sender(&self) -> Address {
        self.sender
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    pub fn gas_price(&self) -> &BigUint {
        &self.gas_price
    }

    pub fn payload(&self) -> &ActionPayload {
        &self.payload
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }
}

impl PartialEq for SignedAction {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for SignedAction {}

impl std::fmt::Debug for SignedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedAction")
            .field("hash", &self.hash)
            .field("sender", &self.sender)
            .field("nonce", &self.nonce)
            .field("gas_price", &self.gas_price)
            .finish_non_exhaustive()
    }
}

fn signing_bytes(
    sender_key: &PublicKey,
    nonce: u64,
    gas_limit: u64,
    gas_price: &BigUint,
    payload: &ActionPayload,
) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&sender_key.to_bytes());
    buf.extend_from_slice(&nonce.to_be_bytes());
    buf.extend_from_slice(&gas_limit.to_be_bytes());
    encode_biguint(&mut buf, gas_price);
    payload.encode_into(&mut buf);
    buf
}

fn envelope_hash(body: &[u8], signature: &Signature) -> Hash {
    let mut buf = Vec::with_capacity(body.len() + 64);
    buf.extend_from_slice(body);
    buf.extend_from_slice(&signature.to_bytes());
    Hash::from_bytes(&buf)
}
