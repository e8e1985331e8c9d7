//! Staking records and the vote reviser.
//!
//! Candidate vote totals are *derived* state: the sum of the weighted stakes
//! of every live bucket pointing at the candidate. Incremental updates can
//! drift over history (bugs, migrations, rounding changes), so at designated
//! heights the [`VoteReviser`] recomputes every total from the full bucket
//! set and writes the healed records back through the
//! [`CandidateStateManager`].
//!
//! # Determinism
//!
//! The recomputation is consensus-critical: every replica must produce
//! byte-identical totals. All arithmetic is arbitrary-precision integer,
//! bucket enumeration is normalized by index, and candidate emission is
//! sorted by the native candidate ordering before persisting.

mod bucket;
mod candidate;
mod reviser;
mod state;
mod vote_weight;

pub use bucket::Bucket;
pub use candidate::{sort_candidates, Candidate};
pub use reviser::VoteReviser;
pub use state::{CandidateStateManager, StateMismatch};
pub use vote_weight::{vote_weight, VoteWeightConsts};
