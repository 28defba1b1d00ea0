//! Unit tests for the tracking module.

mod reconciler_tests;
mod tracker_service_tests;
