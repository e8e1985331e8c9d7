//! Multi-account action pool.

use crate::config::ActPoolConfig;
use crate::error::ActPoolError;
use crate::queue::ActQueue;
use kestrel_types::{AccountState, AccountStateReader, Address, Hash, SignedAction, StateError};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Aggregates per-account [`ActQueue`]s and enforces pool-wide admission
/// policy.
///
/// Each queue is guarded by its own mutex; the address-to-queue map by a
/// read-mostly lock. Operations that visit multiple accounts
/// ([`ActPool::pending_action_map`], [`ActPool::reset`]) take the per-account
/// locks in address order.
pub struct ActPool {
    config: ActPoolConfig,
    state: Arc<dyn AccountStateReader>,
    queues: RwLock<HashMap<Address, Arc<Mutex<ActQueue>>>>,
    /// Content hashes of every pooled action, for duplicate detection and
    /// the global capacity cap.
    all_actions: Mutex<HashSet<Hash>>,
}

impl ActPool {
    pub fn new(config: ActPoolConfig, state: Arc<dyn AccountStateReader>) -> Self {
        Self {
            config,
            state,
            queues: RwLock::new(HashMap::new()),
            all_actions: Mutex::new(HashSet::new()),
        }
    }

    /// Validate and admit an action, routing it to its sender's queue.
    pub fn add(&self, act: SignedAction, now: Duration) -> Result<(), ActPoolError> {
        if !act.verify() {
            return Err(ActPoolError::InvalidSignature);
        }
        if act.gas_price() < &self.config.min_gas_price {
            return Err(ActPoolError::GasPriceBelowFloor);
        }
        let hash = act.hash();
        {
            let all = self.all_actions.lock();
            if all.contains(&hash) {
                return Err(ActPoolError::DuplicateAction(hash));
            }
            if all.len() as u64 >= self.config.max_actions_total {
                return Err(ActPoolError::PoolFull);
            }
        }

        let sender = act.sender();
        let committed = match self.state.account_state(&sender) {
            Ok(state) => state,
            // A sender with no committed state is a fresh account.
            Err(StateError::NotFound) => AccountState::default(),
            Err(err) => return Err(err.into()),
        };
        if act.nonce() <= committed.nonce {
            return Err(ActPoolError::NonceTooLow {
                nonce: act.nonce(),
                confirmed: committed.nonce,
            });
        }
        if act.cost() > committed.balance {
            return Err(ActPoolError::InsufficientBalance);
        }

        let queue = self.queue_for(sender);
        let mut queue = queue.lock();
        // Replacements do not grow the queue, so they pass the cap.
        if queue.len() as u64 >= self.config.max_actions_per_account && !queue.contains(act.nonce())
        {
            return Err(ActPoolError::QueueFull);
        }
        queue.set_now(now);
        queue.set_account_balance(committed.balance);
        let replaced = queue.put(act)?;
        drop(queue);

        let mut all = self.all_actions.lock();
        if let Some(old) = replaced {
            all.remove(&old.hash());
        }
        all.insert(hash);
        debug!(%sender, %hash, pooled = all.len(), "action admitted");
        Ok(())
    }

    /// Snapshot every account's contiguous pending prefix, keyed by sender.
    ///
    /// Intra-account nonce contiguity is guaranteed; ordering across accounts
    /// is the block builder's concern.
    pub fn pending_action_map(&self) -> HashMap<Address, Vec<SignedAction>> {
        let mut map = HashMap::new();
        for (addr, queue) in self.sorted_queues() {
            let acts = queue.lock().pending_acts();
            if !acts.is_empty() {
                map.insert(addr, acts);
            }
        }
        map
    }

    /// Rebase the pool after a block commit.
    ///
    /// For each account with a newly committed nonce, rebase its queue and
    /// drop the confirmed actions; then run every queue's timeout sweep and
    /// refresh its balance snapshot. Queues left empty are destroyed.
    pub fn reset(&self, committed_nonces: &HashMap<Address, u64>, now: Duration) {
        let mut dropped: Vec<Hash> = Vec::new();
        for (addr, queue) in self.sorted_queues() {
            let mut queue = queue.lock();
            queue.set_now(now);
            if let Some(&nonce) = committed_nonces.get(&addr) {
                queue.set_confirmed_nonce(nonce);
                dropped.extend(queue.filter_nonce(nonce + 1).iter().map(|a| a.hash()));
            }
            match self.state.account_state(&addr) {
                Ok(state) => queue.set_account_balance(state.balance),
                Err(err) => {
                    warn!(address = %addr, %err, "balance refresh failed during reset")
                }
            }
            dropped.extend(queue.update_queue().iter().map(|a| a.hash()));
        }
        if !dropped.is_empty() {
            let mut all = self.all_actions.lock();
            for hash in &dropped {
                all.remove(hash);
            }
            debug!(dropped = dropped.len(), "reset dropped actions");
        }
        self.queues.write().retain(|_, queue| !queue.lock().is_empty());
    }

    /// The next nonce the account's queue expects, falling back to the
    /// oracle's confirmed nonce for accounts with no queue.
    pub fn pending_nonce(&self, addr: &Address) -> u64 {
        if let Some(queue) = self.queues.read().get(addr) {
            return queue.lock().pending_nonce();
        }
        match self.state.account_state(addr) {
            Ok(state) => state.nonce + 1,
            Err(_) => 1,
        }
    }

    /// Every buffered action for an account, including those past a gap.
    pub fn unconfirmed_acts(&self, addr: &Address) -> Vec<SignedAction> {
        self.queues
            .read()
            .get(addr)
            .map(|queue| queue.lock().all_acts())
            .unwrap_or_default()
    }

    /// Total number of pooled actions.
    pub fn len(&self) -> usize {
        self.all_actions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_actions.lock().is_empty()
    }

    fn queue_for(&self, sender: Address) -> Arc<Mutex<ActQueue>> {
        if let Some(queue) = self.queues.read().get(&sender) {
            return Arc::clone(queue);
        }
        let mut queues = self.queues.write();
        Arc::clone(queues.entry(sender).or_insert_with(|| {
            Arc::new(Mutex::new(ActQueue::new(
                sender,
                Arc::clone(&self.state),
                self.config.ttl,
            )))
        }))
    }

    /// Snapshot of the queue map in canonical address order.
    fn sorted_queues(&self) -> Vec<(Address, Arc<Mutex<ActQueue>>)> {
        let mut entries: Vec<_> = self
            .queues
            .read()
            .iter()
            .map(|(addr, queue)| (*addr, Arc::clone(queue)))
            .collect();
        entries.sort_by_key(|(addr, _)| *addr);
        entries
    }
}
