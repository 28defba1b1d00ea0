//! Store ports for task and record persistence.

use crate::tracking::domain::{Record, Task, TaskId, TaskStatistics, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Parameter object for a conditional task status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatusUpdate {
    /// Task to update.
    pub task_id: TaskId,
    /// Status the task must currently hold for the update to apply.
    pub expected: TaskStatus,
    /// Status to write when the expectation holds.
    pub new_status: TaskStatus,
    /// Statistics snapshot committed together with the status.
    pub statistics: TaskStatistics,
    /// Mutation timestamp committed together with the status.
    pub updated_at: DateTime<Utc>,
}

/// Task persistence contract.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateTask`] when the task ID already exists.
    async fn create_task(&self, task: &Task) -> StoreResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>>;

    /// Applies a compare-and-set status update.
    ///
    /// Status, statistics, and timestamp are committed as one atomic unit.
    /// Returns `false` without writing when the task's current status does
    /// not match `expected`, signalling a concurrent update.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TaskNotFound`] when the task does not exist.
    async fn update_task_status(&self, update: TaskStatusUpdate) -> StoreResult<bool>;
}

/// Record persistence contract.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Atomically creates or updates the record identified by the given
    /// record's `(task_id, data_unique_key)` pair.
    ///
    /// When a record already exists for the pair, only the outcome fields
    /// (status, operation, data, `updated_at`) are overwritten; identity,
    /// denormalized fields, and `created_at` are preserved. The stored state
    /// after the write is returned. Concurrent upserts for the same pair
    /// serialize on the store's uniqueness constraint, last-committed-wins.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TaskNotFound`] when the owning task does not
    /// exist.
    async fn upsert_record(&self, record: &Record) -> StoreResult<Record>;

    /// Returns all records belonging to the given task, in no particular
    /// order.
    async fn list_records(&self, task_id: TaskId) -> StoreResult<Vec<Record>>;
}

/// Errors returned by store implementations.
///
/// Transient persistence failures are wrapped, never swallowed; every core
/// write is safe to retry blindly after one.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The referenced task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a persistence error.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
