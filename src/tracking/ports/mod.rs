//! Port contracts for task lifecycle tracking.
//!
//! Ports define infrastructure-agnostic interfaces used by tracking
//! services. Any storage technology providing the uniqueness and
//! compare-and-set guarantees documented on [`store`] is conformant.

pub mod store;

pub use store::{RecordStore, StoreError, StoreResult, TaskStatusUpdate, TaskStore};
