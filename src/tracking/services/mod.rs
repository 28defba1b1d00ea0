//! Application services for task lifecycle tracking.

mod lifecycle;
mod reconciler;
mod tracker;

pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleManager, TaskLifecycleResult,
};
pub use reconciler::{Reconciliation, StatusReconciler, StatusReconcilerError, reconcile_records};
pub use tracker::{
    RecordTracker, RecordTrackerError, RecordTrackerResult, ReportOperationRequest,
};
