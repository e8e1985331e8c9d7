//! Per-account action queue.

use crate::error::ActPoolError;
use kestrel_types::{AccountStateReader, Address, SignedAction};
use num_bigint::BigUint;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Heap record for one admitted nonce.
///
/// Ordering is by nonce only; the deadline rides along for the timeout sweep.
#[derive(Debug, Clone, Copy)]
struct NonceEntry {
    nonce: u64,
    deadline: Option<Duration>,
}

impl PartialEq for NonceEntry {
    fn eq(&self, other: &Self) -> bool {
        self.nonce == other.nonce
    }
}

impl Eq for NonceEntry {}

impl Ord for NonceEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.nonce.cmp(&other.nonce)
    }
}

impl PartialOrd for NonceEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordered buffer of one account's pending actions.
///
/// Holds at most one action per nonce. `pending_nonce` tracks the smallest
/// nonce above the confirmed nonce that is *not* buffered, i.e. the end of
/// the contiguous prefix the block builder may take. `put` deliberately does
/// not advance it; that bookkeeping is deferred to [`ActQueue::update_queue`]
/// so admission stays O(log n).
pub struct ActQueue {
    address: Address,
    state: Arc<dyn AccountStateReader>,
    /// All buffered actions, keyed by nonce.
    items: HashMap<u64, SignedAction>,
    /// Min-heap over the buffered nonces.
    index: BinaryHeap<Reverse<NonceEntry>>,
    /// Next nonce expected to extend the contiguous prefix.
    pending_nonce: u64,
    /// Last nonce applied to committed state.
    confirmed_nonce: u64,
    /// Balance snapshot at the confirmed nonce.
    account_balance: BigUint,
    ttl: Duration,
    now: Duration,
}

impl ActQueue {
    /// Create an empty queue for an account.
    ///
    /// `pending_nonce` starts at 1: nonce 0 belongs to the coinbase action,
    /// matching on-chain account state.
    pub fn new(address: Address, state: Arc<dyn AccountStateReader>, ttl: Duration) -> Self {
        Self {
            address,
            state,
            items: HashMap::new(),
            index: BinaryHeap::new(),
            pending_nonce: 1,
            confirmed_nonce: 0,
            account_balance: BigUint::default(),
            ttl,
            now: Duration::ZERO,
        }
    }

    /// Set the queue's view of the current time.
    pub fn set_now(&mut self, now: Duration) {
        self.now = now;
    }

    fn deadline(&self) -> Option<Duration> {
        if self.ttl.is_zero() {
            None
        } else {
            Some(self.now + self.ttl)
        }
    }

    /// Admit an action, or replace the action already at its nonce.
    ///
    /// Replacement requires a strictly higher gas price and refreshes the
    /// slot's TTL deadline. Returns the replaced action, if any.
    pub fn put(&mut self, act: SignedAction) -> Result<Option<SignedAction>, ActPoolError> {
        let nonce = act.nonce();
        if let Some(existing) = self.items.get(&nonce) {
            if act.gas_price() <= existing.gas_price() {
                return Err(ActPoolError::ReplaceUnderpriced);
            }
            let deadline = self.deadline();
            let refreshed: BinaryHeap<Reverse<NonceEntry>> = self
                .index
                .drain()
                .map(|Reverse(mut entry)| {
                    if entry.nonce == nonce {
                        entry.deadline = deadline;
                    }
                    Reverse(entry)
                })
                .collect();
            self.index = refreshed;
            return Ok(self.items.insert(nonce, act));
        }
        self.index.push(Reverse(NonceEntry {
            nonce,
            deadline: self.deadline(),
        }));
        self.items.insert(nonce, act);
        Ok(None)
    }

    /// Remove every action with a nonce below `threshold`, in nonce order.
    ///
    /// Called when the account's confirmed nonce advances.
    pub fn filter_nonce(&mut self, threshold: u64) -> Vec<SignedAction> {
        let mut removed = Vec::new();
        while self
            .index
            .peek()
            .is_some_and(|entry| entry.0.nonce < threshold)
        {
            if let Some(Reverse(entry)) = self.index.pop() {
                if let Some(act) = self.items.remove(&entry.nonce) {
                    removed.push(act);
                }
            }
        }
        removed
    }

    /// Evict every action whose deadline has passed. A no-op when TTL is
    /// disabled.
    ///
    /// An eviction below `pending_nonce` opens a gap in the contiguous
    /// prefix, so the pending nonce rewinds to the evicted slot. Survivors
    /// are re-heapified once rather than sifted per removal.
    fn clean_timeout(&mut self) -> Vec<SignedAction> {
        if self.ttl.is_zero() {
            return Vec::new();
        }
        let mut removed = Vec::new();
        let mut retained = Vec::with_capacity(self.index.len());
        for Reverse(entry) in self.index.drain() {
            let expired = entry.deadline.is_some_and(|deadline| self.now > deadline);
            if expired {
                if entry.nonce < self.pending_nonce {
                    self.pending_nonce = entry.nonce;
                }
                if let Some(act) = self.items.remove(&entry.nonce) {
                    removed.push(act);
                }
            } else {
                retained.push(Reverse(entry));
            }
        }
        self.index = retained.into_iter().collect();
        removed
    }

    /// Two-phase maintenance: sweep timed-out actions, then advance the
    /// pending nonce across the buffered prefix. Returns the evicted actions.
    pub fn update_queue(&mut self) -> Vec<SignedAction> {
        let removed = self.clean_timeout();
        while self.items.contains_key(&self.pending_nonce) {
            self.pending_nonce += 1;
        }
        removed
    }

    /// Rebase onto a newly committed nonce. Callers follow up with
    /// `filter_nonce(nonce + 1)` to drop the now-stale actions.
    pub fn set_confirmed_nonce(&mut self, nonce: u64) {
        self.confirmed_nonce = nonce;
        self.pending_nonce = nonce + 1;
    }

    /// Snapshot of the contiguous pending prefix, rebased on the oracle's
    /// view of the confirmed nonce.
    ///
    /// Oracle failures degrade to an empty snapshot; they never poison the
    /// queue.
    pub fn pending_acts(&self) -> Vec<SignedAction> {
        if self.items.is_empty() {
            return Vec::new();
        }
        let state = match self.state.account_state(&self.address) {
            Ok(state) => state,
            Err(err) => {
                warn!(address = %self.address, %err, "account state lookup failed; empty snapshot");
                return Vec::new();
            }
        };
        let mut acts = Vec::with_capacity(self.items.len());
        let mut nonce = state.nonce + 1;
        while let Some(act) = self.items.get(&nonce) {
            acts.push(act.clone());
            nonce += 1;
        }
        acts
    }

    /// Every buffered action, sorted by nonce.
    pub fn all_acts(&self) -> Vec<SignedAction> {
        let mut nonces: Vec<u64> = self.items.keys().copied().collect();
        nonces.sort_unstable();
        nonces
            .into_iter()
            .filter_map(|nonce| self.items.get(&nonce).cloned())
            .collect()
    }

    pub fn confirmed_nonce(&self) -> u64 {
        self.confirmed_nonce
    }

    pub fn pending_nonce(&self) -> u64 {
        self.pending_nonce
    }

    pub fn account_balance(&self) -> &BigUint {
        &self.account_balance
    }

    pub fn set_account_balance(&mut self, balance: BigUint) {
        self.account_balance = balance;
    }

    /// Whether an action is buffered at this nonce.
    pub fn contains(&self, nonce: u64) -> bool {
        self.items.contains_key(&nonce)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[cfg(test)]
    fn index_len(&self) -> usize {
        self.index.len()
    }
}
