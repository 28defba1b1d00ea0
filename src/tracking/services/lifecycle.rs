//! Lifecycle manager: task creation, start, and finalization.

use super::reconciler::reconcile_records;
use crate::tracking::{
    domain::{
        DataType, Task, TaskDesc, TaskDomainError, TaskId, TaskMode, TaskName, TaskSpec,
        TaskStatus, TaskType,
    },
    ports::{RecordStore, StoreError, TaskStatusUpdate, TaskStore},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
///
/// Type and mode are accepted as labels and parsed against the closed enum
/// sets, so malformed creation input surfaces as a domain error rather than
/// being stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    task_type: String,
    task_mode: String,
    task_name: String,
    task_desc: String,
    data_type: String,
    task_params: Value,
}

impl CreateTaskRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(
        task_type: impl Into<String>,
        task_mode: impl Into<String>,
        task_name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            task_type: task_type.into(),
            task_mode: task_mode.into(),
            task_name: task_name.into(),
            task_desc: String::new(),
            data_type: data_type.into(),
            task_params: Value::Object(serde_json::Map::new()),
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_desc(mut self, task_desc: impl Into<String>) -> Self {
        self.task_desc = task_desc.into();
        self
    }

    /// Sets the structured task parameters.
    #[must_use]
    pub fn with_params(mut self, task_params: Value) -> Self {
        self.task_params = task_params;
        self
    }
}

/// Errors returned by the task lifecycle manager.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Domain validation or state machine violation.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for lifecycle manager operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Orchestrates task creation, start, and finalization over an abstract
/// store.
///
/// Multiple instances may run concurrently against the same store; all
/// coordination happens through store-level atomicity (the record uniqueness
/// constraint and the compare-and-set status update), never in-process
/// locks.
pub struct TaskLifecycleManager<S, C>
where
    S: TaskStore + RecordStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> Clone for TaskLifecycleManager<S, C>
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

impl<S, C> TaskLifecycleManager<S, C>
where
    S: TaskStore + RecordStore,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle manager.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a task in the `Wait` status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the type or mode label is
    /// unrecognized or a scalar field fails validation, and
    /// [`TaskLifecycleError::Store`] when persistence fails.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let spec = TaskSpec {
            task_type: TaskType::try_from(request.task_type.as_str())?,
            task_mode: TaskMode::try_from(request.task_mode.as_str())?,
            task_name: TaskName::new(request.task_name)?,
            task_desc: TaskDesc::new(request.task_desc)?,
            data_type: DataType::new(request.data_type)?,
            task_params: request.task_params,
        };
        let task = Task::new(spec, &*self.clock);
        self.store.create_task(&task).await?;
        Ok(task)
    }

    /// Starts a task, moving it from `Wait` to `Running`.
    ///
    /// The transition is committed with a compare-and-set expecting `Wait`;
    /// losing a concurrent race surfaces as the transition error computed
    /// from the re-read status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for an unknown task and
    /// [`TaskLifecycleError::Domain`] when the task is not in `Wait`.
    pub async fn start_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.require_task(task_id).await?;
        task.start(&*self.clock)?;

        let applied = self
            .store
            .update_task_status(TaskStatusUpdate {
                task_id,
                expected: TaskStatus::Wait,
                new_status: TaskStatus::Running,
                statistics: task.statistics().clone(),
                updated_at: task.updated_at(),
            })
            .await?;
        if applied {
            return Ok(task);
        }

        // Lost a concurrent start or finalize; report the transition error
        // the re-read status implies.
        let current = self.require_task(task_id).await?;
        if current.status().is_terminal() {
            Err(TaskDomainError::AlreadyFinalized {
                task_id,
                status: current.status(),
            }
            .into())
        } else {
            Err(TaskDomainError::InvalidStateTransition {
                task_id,
                from: current.status(),
                to: TaskStatus::Running,
            }
            .into())
        }
    }

    /// Reconciles a running task's records and commits a terminal status
    /// once the records support one.
    ///
    /// While the reconciled candidate is still `Running`, a deadline in the
    /// past forces `Timeout` (a deadline beats indefinitely-pending work);
    /// before the deadline the call is a no-op returning the current
    /// non-terminal task, and callers are expected to poll again. Status and
    /// statistics are committed together with a compare-and-set expecting
    /// `Running`, so two concurrent finalize attempts produce one terminal
    /// write; the loser re-reads and returns the now-terminal task instead
    /// of failing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for an unknown task and
    /// [`TaskLifecycleError::Domain`] with
    /// [`TaskDomainError::AlreadyFinalized`] from a terminal status or
    /// [`TaskDomainError::NotRunning`] from `Wait`.
    pub async fn finalize_task(
        &self,
        task_id: TaskId,
        timeout_deadline: DateTime<Utc>,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.require_task(task_id).await?;
        match task.status() {
            TaskStatus::Running => {}
            status if status.is_terminal() => {
                return Err(TaskDomainError::AlreadyFinalized { task_id, status }.into());
            }
            status => {
                return Err(TaskDomainError::NotRunning { task_id, status }.into());
            }
        }

        let records = self.store.list_records(task_id).await?;
        let reconciliation = reconcile_records(task.status(), &records);
        let mut candidate = reconciliation.candidate;
        if candidate == TaskStatus::Running {
            if self.clock.utc() > timeout_deadline {
                candidate = TaskStatus::Timeout;
            } else {
                // Work genuinely pending and the deadline has not passed.
                return Ok(task);
            }
        }

        task.finalize(candidate, reconciliation.statistics.clone(), &*self.clock)?;
        let applied = self
            .store
            .update_task_status(TaskStatusUpdate {
                task_id,
                expected: TaskStatus::Running,
                new_status: candidate,
                statistics: reconciliation.statistics,
                updated_at: task.updated_at(),
            })
            .await?;
        if applied {
            return Ok(task);
        }

        // A concurrent finalize won the compare-and-set; adopt its result.
        self.require_task(task_id).await
    }

    async fn require_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.store
            .get_task(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }
}
