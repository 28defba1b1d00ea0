//! Record tracker: idempotent persistence of per-operation outcomes.

use crate::tracking::{
    domain::{DataOperation, DataUniqueKey, Record, TaskDomainError, TaskId, TaskStatus},
    ports::{RecordStore, StoreError, TaskStore},
};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for reporting one data-operation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOperationRequest {
    task_id: TaskId,
    data_unique_key: String,
    data_operation: DataOperation,
    task_status: TaskStatus,
    data: Value,
}

impl ReportOperationRequest {
    /// Creates a request with required fields and an empty payload.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        data_unique_key: impl Into<String>,
        data_operation: DataOperation,
        task_status: TaskStatus,
    ) -> Self {
        Self {
            task_id,
            data_unique_key: data_unique_key.into(),
            data_operation,
            task_status,
            data: Value::Object(serde_json::Map::new()),
        }
    }

    /// Sets the structured operation payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

/// Errors returned by the record tracker service.
#[derive(Debug, Error)]
pub enum RecordTrackerError {
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The task is outside its active window; reports are only accepted
    /// while it is running.
    #[error("task {task_id} is not running (status {status:?}), report rejected")]
    TaskNotRunning {
        /// Task the report targeted.
        task_id: TaskId,
        /// Status the task currently holds.
        status: TaskStatus,
    },

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for record tracker operations.
pub type RecordTrackerResult<T> = Result<T, RecordTrackerError>;

/// Service that idempotently persists data-operation outcomes for a running
/// task.
pub struct RecordTracker<S, C>
where
    S: TaskStore + RecordStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> Clone for RecordTracker<S, C>
where
    S: TaskStore + RecordStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, C> RecordTracker<S, C>
where
    S: TaskStore + RecordStore,
    C: Clock + Send + Sync,
{
    /// Creates a new record tracker.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Reports the outcome of one data operation.
    ///
    /// The first report for a `(task, data_unique_key)` pair creates the
    /// record, denormalizing the task's name and data type at that moment;
    /// every later report for the same key overwrites status, operation, and
    /// payload in place. Re-delivery of the same report is therefore
    /// harmless. The task's own status and statistics are never touched
    /// here.
    ///
    /// # Errors
    ///
    /// Returns [`RecordTrackerError::TaskNotFound`] for an unknown task,
    /// [`RecordTrackerError::TaskNotRunning`] when the task is not in its
    /// active window, and [`RecordTrackerError::Domain`] for an invalid key.
    pub async fn report_operation(
        &self,
        request: ReportOperationRequest,
    ) -> RecordTrackerResult<Record> {
        let data_unique_key = DataUniqueKey::new(request.data_unique_key)?;
        let task = self
            .store
            .get_task(request.task_id)
            .await?
            .ok_or(RecordTrackerError::TaskNotFound(request.task_id))?;
        if task.status() != TaskStatus::Running {
            return Err(RecordTrackerError::TaskNotRunning {
                task_id: request.task_id,
                status: task.status(),
            });
        }

        let record = Record::new(
            &task,
            data_unique_key,
            request.data_operation,
            request.task_status,
            request.data,
            &*self.clock,
        );
        Ok(self.store.upsert_record(&record).await?)
    }
}
