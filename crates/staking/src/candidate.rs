//! Validator candidate records.

use kestrel_types::Address;
use num_bigint::BigUint;

/// A validator registration.
///
/// `votes` and `self_stake` are derived from the bucket set, never a source
/// of truth; the vote reviser may rewrite both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Owning account; the stable identity of the candidate.
    pub owner: Address,
    /// Key the candidate operates (produces blocks) with.
    pub operator: Address,
    /// Account block rewards are paid to.
    pub reward: Address,
    /// Registered display name.
    pub name: String,
    /// Aggregate weighted votes.
    pub votes: BigUint,
    /// Amount staked in the candidate's own bucket.
    pub self_stake: BigUint,
    /// Index of the bucket that carries the self-stake.
    pub self_stake_bucket_idx: u64,
}

/// Sort candidates by the state manager's native ordering: votes descending,
/// ties broken by owner address ascending.
pub fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.owner.cmp(&b.owner)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_types::test_utils::test_address;

    fn candidate(owner: Address, votes: u64) -> Candidate {
        Candidate {
            owner,
            operator: owner,
            reward: owner,
            name: String::new(),
            votes: BigUint::from(votes),
            self_stake: BigUint::default(),
            self_stake_bucket_idx: 0,
        }
    }

    #[test]
    fn test_native_ordering() {
        let a = Address::from_raw([1u8; 20]);
        let b = Address::from_raw([2u8; 20]);
        let c = test_address(3);
        let mut cands = vec![candidate(b, 10), candidate(a, 10), candidate(c, 99)];
        sort_candidates(&mut cands);
        assert_eq!(cands[0].owner, c);
        assert_eq!(cands[1].owner, a);
        assert_eq!(cands[2].owner, b);
    }
}
