//! Action admission and ordering.
//!
//! This crate implements the pending-action pool as two layers:
//!
//! - [`ActQueue`]: the per-account state machine. Orders actions by nonce,
//!   enforces strict gas-price replacement, expires actions past their TTL,
//!   and tracks the contiguous pending prefix the block builder may take.
//! - [`ActPool`]: the multi-account aggregator. Routes admissions by sender,
//!   validates signatures, the gas-price floor, balances and capacity caps,
//!   and produces pending-action snapshots for block assembly.
//!
//! # Concurrency
//!
//! The natural concurrency unit is the account: each queue sits behind its
//! own mutex and the address-to-queue map behind a read-mostly lock.
//! Cross-account operations visit queues in address order.
//!
//! # Time
//!
//! The pool never reads a wall clock. Callers pass `now` (an offset from the
//! unix epoch) into the operations that need it, which keeps TTL behavior
//! deterministic under test.

mod config;
mod error;
mod pool;
mod queue;

pub use config::ActPoolConfig;
pub use error::ActPoolError;
pub use pool::ActPool;
pub use queue::ActQueue;
