//! Batch task lifecycle tracking.
//!
//! Tracks the execution lifecycle of batch/background tasks and the
//! data-level operation records each task emits: a state machine over the
//! aggregate task status, idempotent upsert of per-operation records, and
//! pure reconciliation of record outcomes into statistics and a terminal
//! status. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
