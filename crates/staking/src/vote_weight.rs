//! The vote weight function.
//!
//! Weights are fixed-point in basis points (10_000 = 1.0) and computed in
//! arbitrary-precision integers end to end. Floating point would make
//! replicas disagree on the low bits, which here is a consensus failure.

use crate::bucket::Bucket;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Fixed-point scale for weight factors.
const BASIS_POINTS: u64 = 10_000;

/// Minimum committed duration for the self-stake boost to apply.
const SELF_STAKE_MIN_DAYS: u32 = 91;

/// Network constants driving the weight formula. Frozen per genesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteWeightConsts {
    /// Weight bonus per doubling of the committed duration, in basis points.
    pub duration_rate_bp: u64,
    /// Duration multiplier granted to auto-staked buckets, in basis points.
    pub auto_stake_bonus_bp: u64,
    /// Multiplier applied to a qualifying self-stake bucket, in basis points.
    pub self_stake_boost_bp: u64,
}

impl Default for VoteWeightConsts {
    fn default() -> Self {
        Self {
            duration_rate_bp: 125,
            auto_stake_bonus_bp: 1_000,
            self_stake_boost_bp: 10_600,
        }
    }
}

/// Weighted votes contributed by one bucket.
///
/// `self_stake` marks the bucket as the candidate's own: with auto-stake on
/// and at least [`SELF_STAKE_MIN_DAYS`] committed, the candidate's skin in
/// the game earns the boost multiplier.
pub fn vote_weight(consts: &VoteWeightConsts, bucket: &Bucket, self_stake: bool) -> BigUint {
    let mut weight_bp = BASIS_POINTS;
    if bucket.staked_duration_days > 0 {
        let duration_factor = u64::from(bucket.staked_duration_days)
            * (BASIS_POINTS
                + if bucket.auto_stake {
                    consts.auto_stake_bonus_bp
                } else {
                    0
                })
            / BASIS_POINTS;
        weight_bp += consts.duration_rate_bp * u64::from((1 + duration_factor).ilog2());
    }
    let mut weighted = &bucket.staked_amount * weight_bp;
    if self_stake && bucket.auto_stake && bucket.staked_duration_days >= SELF_STAKE_MIN_DAYS {
        weighted = weighted * consts.self_stake_boost_bp / BASIS_POINTS;
    }
    weighted / BASIS_POINTS
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_types::Address;

    fn bucket(amount: u64, days: u32, auto_stake: bool) -> Bucket {
        Bucket {
            index: 0,
            candidate: Address::ZERO,
            owner: Address::ZERO,
            staked_amount: BigUint::from(amount),
            staked_duration_days: days,
            auto_stake,
            unstake_start: None,
        }
    }

    #[test]
    fn test_zero_duration_weighs_at_par() {
        let consts = VoteWeightConsts::default();
        assert_eq!(
            vote_weight(&consts, &bucket(1_000_000, 0, false), false),
            BigUint::from(1_000_000u64)
        );
    }

    #[test]
    fn test_weight_grows_with_duration() {
        let consts = VoteWeightConsts::default();
        let short = vote_weight(&consts, &bucket(1_000_000, 7, false), false);
        let long = vote_weight(&consts, &bucket(1_000_000, 364, false), false);
        assert!(long > short);
        assert!(short > BigUint::from(1_000_000u64));
    }

    #[test]
    fn test_auto_stake_raises_weight() {
        let consts = VoteWeightConsts::default();
        let plain = vote_weight(&consts, &bucket(1_000_000, 364, false), false);
        let auto = vote_weight(&consts, &bucket(1_000_000, 364, true), false);
        assert!(auto >= plain);
    }

    #[test]
    fn test_self_stake_boost_needs_auto_stake_and_duration() {
        let consts = VoteWeightConsts::default();

        let qualifying = bucket(1_000_000, 91, true);
        let boosted = vote_weight(&consts, &qualifying, true);
        let unboosted = vote_weight(&consts, &qualifying, false);
        assert!(boosted > unboosted);

        // Too short a commitment: no boost even as self-stake.
        let short = bucket(1_000_000, 90, true);
        assert_eq!(
            vote_weight(&consts, &short, true),
            vote_weight(&consts, &short, false)
        );

        // No auto-stake: no boost.
        let manual = bucket(1_000_000, 91, false);
        assert_eq!(
            vote_weight(&consts, &manual, true),
            vote_weight(&consts, &manual, false)
        );
    }

    #[test]
    fn test_weight_is_deterministic() {
        let consts = VoteWeightConsts::default();
        let b = bucket(123_456_789, 180, true);
        assert_eq!(vote_weight(&consts, &b, true), vote_weight(&consts, &b, true));
    }
}
