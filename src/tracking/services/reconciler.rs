//! Reconciliation of record outcomes into task statistics and status.

use crate::tracking::{
    domain::{Record, TaskId, TaskStatistics, TaskStatus},
    ports::{RecordStore, StoreError, TaskStore},
};
use std::sync::Arc;
use thiserror::Error;

/// Outcome of reconciling a task's records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Aggregate counts derived from the records.
    pub statistics: TaskStatistics,
    /// Status the records support, `Running` while work is in flight.
    pub candidate: TaskStatus,
}

/// Derives aggregate statistics and a candidate status from a task's
/// records.
///
/// Pure and re-runnable: the same record set always yields the same result.
/// The decision list is evaluated in priority order, first match wins:
///
/// 1. no records: `Running` if the task itself is running, otherwise the
///    task's current status (an empty record set is not terminal);
/// 2. any pending record: `Running`;
/// 3. every record failed: `Fail`;
/// 4. every record succeeded: `Success`;
/// 5. some records timed out and none are pending: `Timeout`;
/// 6. otherwise (mixed outcomes, nothing pending): `Part`.
#[must_use]
pub fn reconcile_records(task_status: TaskStatus, records: &[Record]) -> Reconciliation {
    let mut statistics = TaskStatistics::default();
    for record in records {
        statistics.total += 1;
        match record.status() {
            TaskStatus::Success => statistics.succeeded += 1,
            TaskStatus::Fail => statistics.failed += 1,
            TaskStatus::Timeout => statistics.timed_out += 1,
            TaskStatus::Wait | TaskStatus::Running => statistics.pending += 1,
            // Record-level partial outcomes count toward the total only.
            TaskStatus::Part => {}
        }
    }

    let candidate = if statistics.total == 0 {
        if task_status == TaskStatus::Running {
            TaskStatus::Running
        } else {
            task_status
        }
    } else if statistics.pending > 0 {
        TaskStatus::Running
    } else if statistics.failed == statistics.total {
        TaskStatus::Fail
    } else if statistics.succeeded == statistics.total {
        TaskStatus::Success
    } else if statistics.timed_out > 0 {
        TaskStatus::Timeout
    } else {
        TaskStatus::Part
    };

    Reconciliation {
        statistics,
        candidate,
    }
}

/// Errors returned by the status reconciler service.
#[derive(Debug, Error)]
pub enum StatusReconcilerError {
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read-only reconciliation service for progress snapshots.
///
/// Persists nothing; finalization applies the result through the lifecycle
/// manager.
pub struct StatusReconciler<S>
where
    S: TaskStore + RecordStore,
{
    store: Arc<S>,
}

impl<S> Clone for StatusReconciler<S>
where
    S: TaskStore + RecordStore,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> StatusReconciler<S>
where
    S: TaskStore + RecordStore,
{
    /// Creates a new reconciler over the given store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Computes the current statistics and candidate status for a task.
    ///
    /// # Errors
    ///
    /// Returns [`StatusReconcilerError::TaskNotFound`] for an unknown task
    /// and [`StatusReconcilerError::Store`] when the store fails.
    pub async fn reconcile(&self, task_id: TaskId) -> Result<Reconciliation, StatusReconcilerError> {
        let task = self
            .store
            .get_task(task_id)
            .await?
            .ok_or(StatusReconcilerError::TaskNotFound(task_id))?;
        let records = self.store.list_records(task_id).await?;
        Ok(reconcile_records(task.status(), &records))
    }
}
