//! Candidate state manager seam.

use crate::bucket::Bucket;
use crate::candidate::Candidate;
use thiserror::Error;

/// A failed candidate-state read or write during a revise.
///
/// Fatal to the enclosing commit: a divergence between the derived totals and
/// the persisted state is a safety-critical condition.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("candidate state mismatch: {0}")]
pub struct StateMismatch(pub String);

/// Read and upsert access to the candidate and bucket tables.
///
/// `upsert` must be idempotent keyed by the candidate's owner address.
pub trait CandidateStateManager {
    fn list_candidates(&self) -> Result<Vec<Candidate>, StateMismatch>;

    fn list_buckets(&self) -> Result<Vec<Bucket>, StateMismatch>;

    fn upsert(&mut self, candidate: Candidate) -> Result<(), StateMismatch>;
}
