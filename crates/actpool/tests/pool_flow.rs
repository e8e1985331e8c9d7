//! End-to-end pool flow: a burst of mixed actions from one sender, with one
//! stale-nonce action rejected along the way.

use kestrel_actpool::{ActPool, ActPoolConfig, ActPoolError};
use kestrel_types::test_utils::{test_keypair, InMemoryState};
use kestrel_types::{AccountStateReader, ActionPayload, KeyPair, SignedAction, StakingCommand};
use num_bigint::BigUint;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

fn transfer(key: &KeyPair, nonce: u64, amount: u64) -> SignedAction {
    SignedAction::sign(
        key,
        nonce,
        100_000,
        BigUint::from(10u64),
        ActionPayload::Transfer {
            recipient: test_keypair(0xEE).address(),
            amount: BigUint::from(amount),
            payload: Vec::new(),
        },
    )
}

fn execution(key: &KeyPair, nonce: u64) -> SignedAction {
    SignedAction::sign(
        key,
        nonce,
        120_000,
        BigUint::from(10u64),
        ActionPayload::Execution {
            contract: None,
            amount: BigUint::from(0u64),
            data: vec![0x60, 0x80],
        },
    )
}

#[test]
fn test_mixed_burst_yields_contiguous_pending_prefix() {
    let state = Arc::new(InMemoryState::new());
    let reader: Arc<dyn AccountStateReader> = Arc::clone(&state) as Arc<dyn AccountStateReader>;
    let pool = ActPool::new(
        ActPoolConfig::default().with_min_gas_price(BigUint::from(1u64)),
        reader,
    );

    let sender = test_keypair(1);
    state.set_account(sender.address(), 0, BigUint::from(u64::MAX));

    let now = Duration::ZERO;
    pool.add(transfer(&sender, 1, 1), now).unwrap();
    pool.add(transfer(&sender, 2, 3), now).unwrap();
    pool.add(transfer(&sender, 3, 3), now).unwrap();
    pool.add(execution(&sender, 4), now).unwrap();

    // A second action at nonce 2 with the same gas price is underpriced.
    let err = pool.add(transfer(&sender, 2, 5), now).unwrap_err();
    assert!(matches!(err, ActPoolError::ReplaceUnderpriced));

    let map = pool.pending_action_map();
    let total: usize = map.values().map(Vec::len).sum();
    assert_eq!(total, 4);
    assert_eq!(
        map[&sender.address()]
            .iter()
            .map(|a| a.nonce())
            .collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
}

#[test]
fn test_staking_actions_route_through_the_pool() {
    let state = Arc::new(InMemoryState::new());
    let reader: Arc<dyn AccountStateReader> = Arc::clone(&state) as Arc<dyn AccountStateReader>;
    let pool = ActPool::new(
        ActPoolConfig::default().with_min_gas_price(BigUint::from(1u64)),
        reader,
    );

    let staker = test_keypair(2);
    state.set_account(staker.address(), 0, BigUint::from(u64::MAX));

    let stake = SignedAction::sign(
        &staker,
        1,
        10_000,
        BigUint::from(10u64),
        ActionPayload::Staking(StakingCommand::CreateBucket {
            candidate: test_keypair(3).address(),
            amount: BigUint::from(100u64),
            duration_days: 91,
            auto_stake: true,
        }),
    );
    pool.add(stake, Duration::ZERO).unwrap();
    assert_eq!(pool.len(), 1);
}

#[test]
fn test_commit_then_refill_cycle() {
    let state = Arc::new(InMemoryState::new());
    let reader: Arc<dyn AccountStateReader> = Arc::clone(&state) as Arc<dyn AccountStateReader>;
    let pool = ActPool::new(
        ActPoolConfig::default().with_min_gas_price(BigUint::from(1u64)),
        reader,
    );

    let sender = test_keypair(4);
    state.set_account(sender.address(), 0, BigUint::from(u64::MAX));

    for nonce in 1..=4 {
        pool.add(transfer(&sender, nonce, 1), Duration::ZERO).unwrap();
    }

    // A block takes the first three actions.
    state.set_account(sender.address(), 3, BigUint::from(u64::MAX));
    pool.reset(
        &HashMap::from([(sender.address(), 3u64)]),
        Duration::from_secs(5),
    );
    assert_eq!(pool.len(), 1);
    assert_eq!(pool.pending_nonce(&sender.address()), 5);

    // The sender keeps going from the new confirmed nonce.
    pool.add(transfer(&sender, 5, 1), Duration::from_secs(5)).unwrap();
    let map = pool.pending_action_map();
    assert_eq!(
        map[&sender.address()]
            .iter()
            .map(|a| a.nonce())
            .collect::<Vec<_>>(),
        vec![4, 5]
    );
}
