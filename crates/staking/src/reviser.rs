//! Deterministic recomputation of candidate vote totals.

use crate::bucket::Bucket;
use crate::candidate::{sort_candidates, Candidate};
use crate::state::{CandidateStateManager, StateMismatch};
use crate::vote_weight::{vote_weight, VoteWeightConsts};
use kestrel_types::Address;
use num_bigint::BigUint;
use std::collections::HashMap;
use tracing::warn;

/// Recalculates candidate votes at designated revise heights.
///
/// Runs inside the state-commit critical section for its height. The result
/// is memoized per height so that recovery paths re-invoking `revise` flush
/// the cached list instead of recomputing.
pub struct VoteReviser {
    consts: VoteWeightConsts,
    revise_heights: Vec<u64>,
    cache: HashMap<u64, Vec<Candidate>>,
}

impl VoteReviser {
    pub fn new(consts: VoteWeightConsts, revise_heights: Vec<u64>) -> Self {
        Self {
            consts,
            revise_heights,
            cache: HashMap::new(),
        }
    }

    /// Whether `height` is one of the designated revise heights.
    pub fn need_revise(&self, height: u64) -> bool {
        self.revise_heights.contains(&height)
    }

    /// Recompute every candidate's votes from the full bucket set and
    /// persist the healed records.
    pub fn revise(
        &mut self,
        csm: &mut dyn CandidateStateManager,
        height: u64,
    ) -> Result<(), StateMismatch> {
        if !self.cache.contains_key(&height) {
            let candidates = self.calculate_vote_weight(csm)?;
            self.cache.insert(height, candidates);
        }
        self.flush(height, csm)
    }

    fn calculate_vote_weight(
        &self,
        csm: &dyn CandidateStateManager,
    ) -> Result<Vec<Candidate>, StateMismatch> {
        let candidates = csm.list_candidates()?;
        let mut by_owner: HashMap<Address, Candidate> = candidates
            .into_iter()
            .map(|mut candidate| {
                candidate.votes = BigUint::default();
                candidate.self_stake = BigUint::default();
                (candidate.owner, candidate)
            })
            .collect();

        let mut buckets = csm.list_buckets()?;
        // Normalize enumeration order; the bucket table is unordered.
        buckets.sort_unstable_by_key(|bucket| bucket.index);

        for bucket in &buckets {
            if bucket.is_unstaked() {
                continue;
            }
            let Some(candidate) = by_owner.get_mut(&bucket.candidate) else {
                // Orphan buckets are a soft error: compute as if absent.
                warn!(
                    bucket_index = bucket.index,
                    candidate = %bucket.candidate,
                    "bucket references an unknown candidate"
                );
                continue;
            };
            let self_stake = candidate.self_stake_bucket_idx == bucket.index;
            candidate.votes += vote_weight(&self.consts, bucket, self_stake);
            if self_stake {
                candidate.self_stake = bucket.staked_amount.clone();
            }
        }

        Ok(by_owner.into_values().collect())
    }

    fn flush(
        &self,
        height: u64,
        csm: &mut dyn CandidateStateManager,
    ) -> Result<(), StateMismatch> {
        let Some(cached) = self.cache.get(&height) else {
            return Ok(());
        };
        let mut candidates = cached.clone();
        sort_candidates(&mut candidates);
        for candidate in candidates {
            csm.upsert(candidate)?;
        }
        Ok(())
    }
}
