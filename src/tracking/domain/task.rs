//! Task aggregate root and related lifecycle types.

use super::{DataType, TaskDesc, TaskDomainError, TaskId, TaskName, TaskStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Kind of scheduled work a task performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Report generation.
    Report,
    /// Cleanup of stale data.
    Cleanup,
    /// Data synchronization between systems.
    DataSync,
}

impl TaskType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Cleanup => "cleanup",
            Self::DataSync => "data_sync",
        }
    }
}

impl TryFrom<&str> for TaskType {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "report" => Ok(Self::Report),
            "cleanup" => Ok(Self::Cleanup),
            "data_sync" => Ok(Self::DataSync),
            _ => Err(TaskDomainError::UnknownTaskType(value.to_owned())),
        }
    }
}

/// Whether a task processes the full dataset or a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskMode {
    /// Processes the full dataset.
    Full,
    /// Processes a subset.
    Part,
}

impl TaskMode {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Part => "part",
        }
    }
}

impl TryFrom<&str> for TaskMode {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "full" => Ok(Self::Full),
            "part" => Ok(Self::Part),
            _ => Err(TaskDomainError::UnknownTaskMode(value.to_owned())),
        }
    }
}

/// Aggregate outcome counts derived from a task's records.
///
/// Written only by reconciliation; the initial value on a fresh task is all
/// zeroes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskStatistics {
    /// Number of records observed.
    pub total: u64,
    /// Records whose status is success.
    pub succeeded: u64,
    /// Records whose status is fail.
    pub failed: u64,
    /// Records whose status is timeout.
    pub timed_out: u64,
    /// Records still waiting or running.
    pub pending: u64,
    /// Caller-defined metrics carried alongside the counts.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub custom: serde_json::Map<String, Value>,
}

/// Parameter object describing a task to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    /// Kind of work the task performs.
    pub task_type: TaskType,
    /// Full-dataset or subset processing.
    pub task_mode: TaskMode,
    /// Human-readable name.
    pub task_name: TaskName,
    /// Free-form description.
    pub task_desc: TaskDesc,
    /// Classification of the dataset acted upon.
    pub data_type: DataType,
    /// Arbitrary structured configuration, immutable after creation.
    pub task_params: Value,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted task type.
    pub task_type: TaskType,
    /// Persisted task name.
    pub task_name: TaskName,
    /// Persisted task mode.
    pub task_mode: TaskMode,
    /// Persisted description.
    pub task_desc: TaskDesc,
    /// Persisted lifecycle status.
    pub task_status: TaskStatus,
    /// Persisted dataset classification.
    pub data_type: DataType,
    /// Persisted configuration payload.
    pub task_params: Value,
    /// Persisted aggregate statistics.
    pub task_statistics: TaskStatistics,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Task aggregate root: one unit of scheduled batch work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    task_type: TaskType,
    task_name: TaskName,
    task_mode: TaskMode,
    task_desc: TaskDesc,
    task_status: TaskStatus,
    data_type: DataType,
    task_params: Value,
    task_statistics: TaskStatistics,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in the `Wait` status.
    #[must_use]
    pub fn new(spec: TaskSpec, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            task_type: spec.task_type,
            task_name: spec.task_name,
            task_mode: spec.task_mode,
            task_desc: spec.task_desc,
            task_status: TaskStatus::Wait,
            data_type: spec.data_type,
            task_params: spec.task_params,
            task_statistics: TaskStatistics::default(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            task_type: data.task_type,
            task_name: data.task_name,
            task_mode: data.task_mode,
            task_desc: data.task_desc,
            task_status: data.task_status,
            data_type: data.data_type,
            task_params: data.task_params,
            task_statistics: data.task_statistics,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task type.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the task name.
    #[must_use]
    pub const fn task_name(&self) -> &TaskName {
        &self.task_name
    }

    /// Returns the task mode.
    #[must_use]
    pub const fn task_mode(&self) -> TaskMode {
        self.task_mode
    }

    /// Returns the task description.
    #[must_use]
    pub const fn task_desc(&self) -> &TaskDesc {
        &self.task_desc
    }

    /// Returns the current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.task_status
    }

    /// Returns the dataset classification.
    #[must_use]
    pub const fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Returns the configuration payload.
    #[must_use]
    pub const fn task_params(&self) -> &Value {
        &self.task_params
    }

    /// Returns the aggregate statistics snapshot.
    #[must_use]
    pub const fn statistics(&self) -> &TaskStatistics {
        &self.task_statistics
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the elapsed wall-clock time between creation and the latest
    /// mutation, in milliseconds. Only meaningful once the status is
    /// terminal.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.updated_at - self.created_at).num_milliseconds()
    }

    /// Starts the task, moving it from `Wait` to `Running`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyFinalized`] from a terminal status
    /// and [`TaskDomainError::InvalidStateTransition`] from any other
    /// non-`Wait` status.
    pub fn start(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        match self.task_status {
            TaskStatus::Wait => {
                self.task_status = TaskStatus::Running;
                self.touch(clock);
                Ok(())
            }
            status if status.is_terminal() => Err(TaskDomainError::AlreadyFinalized {
                task_id: self.id,
                status,
            }),
            status => Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: status,
                to: TaskStatus::Running,
            }),
        }
    }

    /// Finalizes the task, committing a terminal status and its statistics
    /// snapshot together.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when `status` is
    /// not terminal, [`TaskDomainError::AlreadyFinalized`] when the task
    /// already holds a terminal status, and [`TaskDomainError::NotRunning`]
    /// when the task has not been started.
    pub fn finalize(
        &mut self,
        status: TaskStatus,
        statistics: TaskStatistics,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !status.is_terminal() {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.task_status,
                to: status,
            });
        }
        match self.task_status {
            TaskStatus::Running => {
                self.task_status = status;
                self.task_statistics = statistics;
                self.touch(clock);
                Ok(())
            }
            current if current.is_terminal() => Err(TaskDomainError::AlreadyFinalized {
                task_id: self.id,
                status: current,
            }),
            current => Err(TaskDomainError::NotRunning {
                task_id: self.id,
                status: current,
            }),
        }
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} - {}] {}",
            self.data_type,
            self.task_type.as_str(),
            self.task_name
        )
    }
}
