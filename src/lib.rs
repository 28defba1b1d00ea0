//! Taskledger: batch task lifecycle tracking.
//!
//! This crate tracks the execution lifecycle of batch/background tasks
//! (report generation, cleanup, data synchronization) and the individual
//! data-level operation records each task performs, reconciling record
//! outcomes into an aggregate task status.
//!
//! # Architecture
//!
//! Taskledger follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, database)
//!
//! The crate is a library: a host scheduler or worker process drives the
//! [`tracking::services::TaskLifecycleManager`] and reports per-unit
//! outcomes through the [`tracking::services::RecordTracker`].

pub mod tracking;
