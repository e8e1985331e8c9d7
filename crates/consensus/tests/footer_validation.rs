//! Footer validation against a seven-delegate epoch.

use kestrel_consensus::{ConsensusError, EpochManager, EpochSchedule, FooterValidator};
use kestrel_types::test_utils::{test_keypair, InMemoryChain};
use kestrel_types::{
    Address, Block, BlockHeader, ChainManager, ConsensusVote, Endorsement, Genesis, Hash, KeyPair,
    Topic,
};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

fn delegate_keys() -> Vec<KeyPair> {
    (1..=7).map(test_keypair).collect()
}

fn setup(keys: &[KeyPair]) -> FooterValidator {
    let genesis = Genesis {
        num_delegates: keys.len() as u64,
        num_subepochs: 2,
        ..Genesis::default()
    };
    let schedule = EpochSchedule::from_genesis(&genesis);
    let chain = Arc::new(InMemoryChain::new(genesis)) as Arc<dyn ChainManager>;
    let delegates: Vec<Address> = keys.iter().map(KeyPair::address).collect();
    let manager = EpochManager::new(chain, schedule, delegates, false);
    FooterValidator::new(Arc::new(RwLock::new(manager)))
}

fn block_produced_by(producer: Address, height: u64) -> Block {
    Block {
        header: BlockHeader {
            height,
            timestamp: Duration::from_secs(height * 10),
            producer,
            prev_hash: Hash::ZERO,
            delegates: None,
        },
        actions: Vec::new(),
        endorsements: Vec::new(),
    }
}

fn endorse(block: &mut Block, keys: &[KeyPair], count: usize) {
    let vote = ConsensusVote::new(block.hash(), Topic::Commit);
    block.endorsements = keys
        .iter()
        .take(count)
        .map(|key| Endorsement::sign(&vote, key, Duration::ZERO))
        .collect();
}

#[test]
fn test_five_of_seven_commits_is_a_supermajority() {
    let keys = delegate_keys();
    let validator = setup(&keys);
    let mut block = block_produced_by(keys[0].address(), 7);
    // 3 * 5 = 15 > 2 * 7 = 14.
    endorse(&mut block, &keys, 5);
    validator.validate_block_vote(&block).unwrap();
}

#[test]
fn test_four_of_seven_commits_is_rejected() {
    let keys = delegate_keys();
    let validator = setup(&keys);
    let mut block = block_produced_by(keys[0].address(), 7);
    // 3 * 4 = 12 <= 14.
    endorse(&mut block, &keys, 4);
    let err = validator.validate_block_vote(&block).unwrap_err();
    assert!(matches!(
        err,
        ConsensusError::InsufficientEndorsements {
            commits: 4,
            delegates: 7
        }
    ));
}

#[test]
fn test_duplicate_endorsers_do_not_inflate_the_count() {
    let keys = delegate_keys();
    let validator = setup(&keys);
    let mut block = block_produced_by(keys[0].address(), 7);

    let vote = ConsensusVote::new(block.hash(), Topic::Commit);
    // Four distinct endorsers, one of them repeated twice.
    let mut endorsements: Vec<Endorsement> = keys
        .iter()
        .take(4)
        .map(|key| Endorsement::sign(&vote, key, Duration::ZERO))
        .collect();
    endorsements.push(Endorsement::sign(&vote, &keys[0], Duration::ZERO));
    block.endorsements = endorsements;

    let err = validator.validate_block_vote(&block).unwrap_err();
    assert!(matches!(
        err,
        ConsensusError::InsufficientEndorsements { commits: 4, .. }
    ));
}

#[test]
fn test_endorsement_for_another_block_rejects_the_footer() {
    let keys = delegate_keys();
    let validator = setup(&keys);
    let mut block = block_produced_by(keys[0].address(), 7);
    endorse(&mut block, &keys, 5);

    // One endorsement re-signed against a different hash.
    let foreign = ConsensusVote::new(Hash::from_bytes(b"foreign block"), Topic::Commit);
    block.endorsements[0] = Endorsement::sign(&foreign, &keys[0], Duration::ZERO);

    let err = validator.validate_block_vote(&block).unwrap_err();
    assert!(matches!(err, ConsensusError::InvalidEndorsement));
}

#[test]
fn test_producer_must_be_the_round_proposer() {
    let keys = delegate_keys();
    let validator = setup(&keys);

    // Height 3 with no time rotation selects delegate index 3.
    let block = block_produced_by(keys[3].address(), 3);
    validator.validate_block_producer(&block).unwrap();

    let block = block_produced_by(keys[0].address(), 3);
    let err = validator.validate_block_producer(&block).unwrap_err();
    assert!(matches!(err, ConsensusError::InvalidProposer(_)));
}

#[test]
fn test_producer_outside_the_delegate_list_is_rejected() {
    let keys = delegate_keys();
    let validator = setup(&keys);
    let outsider = test_keypair(99);
    let block = block_produced_by(outsider.address(), 3);
    let err = validator.validate_block_producer(&block).unwrap_err();
    assert!(matches!(err, ConsensusError::NotADelegate(_)));
}
