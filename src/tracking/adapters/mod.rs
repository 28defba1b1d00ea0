//! Adapter implementations of the tracking store ports.

pub mod memory;
pub mod postgres;
