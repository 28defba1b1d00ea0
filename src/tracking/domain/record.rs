//! Operation record entity: one data-level outcome within a task.

use super::{DataType, DataUniqueKey, RecordId, Task, TaskDomainError, TaskId, TaskName, TaskStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Kind of data operation a record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOperation {
    /// Read-only lookup.
    Query,
    /// Creation of a data unit.
    Create,
    /// Mutation of an existing data unit.
    Update,
    /// Removal of a data unit.
    Delete,
}

impl DataOperation {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl TryFrom<&str> for DataOperation {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "query" => Ok(Self::Query),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(TaskDomainError::UnknownDataOperation(value.to_owned())),
        }
    }
}

/// Parameter object for reconstructing a persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRecordData {
    /// Persisted record identifier.
    pub id: RecordId,
    /// Owning task identifier.
    pub task_id: TaskId,
    /// Task name denormalized at record-creation time.
    pub task_name: TaskName,
    /// Record-level outcome status.
    pub task_status: TaskStatus,
    /// Dataset classification denormalized at record-creation time.
    pub data_type: DataType,
    /// Kind of data operation performed.
    pub data_operation: DataOperation,
    /// Caller-supplied idempotency key, unique within the task.
    pub data_unique_key: DataUniqueKey,
    /// Structured payload or result of the operation.
    pub data: Value,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// One data-level operation outcome within a task.
///
/// Logically identified by `(task_id, data_unique_key)`. The task name and
/// data type are copied from the owning task when the record is first
/// created and are never re-synced afterwards; reads stay join-free at the
/// cost of staleness if the task is later edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: RecordId,
    task_id: TaskId,
    task_name: TaskName,
    task_status: TaskStatus,
    data_type: DataType,
    data_operation: DataOperation,
    data_unique_key: DataUniqueKey,
    data: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Record {
    /// Creates a record for the first report of a key, denormalizing the
    /// owning task's name and data type at this moment.
    #[must_use]
    pub fn new(
        task: &Task,
        data_unique_key: DataUniqueKey,
        data_operation: DataOperation,
        task_status: TaskStatus,
        data: Value,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: RecordId::new(),
            task_id: task.id(),
            task_name: task.task_name().clone(),
            task_status,
            data_type: task.data_type().clone(),
            data_operation,
            data_unique_key,
            data,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedRecordData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            task_name: data.task_name,
            task_status: data.task_status,
            data_type: data.data_type,
            data_operation: data.data_operation,
            data_unique_key: data.data_unique_key,
            data: data.data,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the denormalized task name.
    #[must_use]
    pub const fn task_name(&self) -> &TaskName {
        &self.task_name
    }

    /// Returns the record-level outcome status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.task_status
    }

    /// Returns the denormalized dataset classification.
    #[must_use]
    pub const fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Returns the kind of data operation performed.
    #[must_use]
    pub const fn data_operation(&self) -> DataOperation {
        self.data_operation
    }

    /// Returns the idempotency key.
    #[must_use]
    pub const fn data_unique_key(&self) -> &DataUniqueKey {
        &self.data_unique_key
    }

    /// Returns the structured operation payload.
    #[must_use]
    pub const fn data(&self) -> &Value {
        &self.data
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

    /// Overwrites the outcome fields with a fresh report for the same key.
    ///
    /// Identity, denormalized fields, and `created_at` are untouched;
    /// repeated application of the same report leaves the record unchanged.
    pub fn apply_report(
        &mut self,
        task_status: TaskStatus,
        data_operation: DataOperation,
        data: Value,
        clock: &impl Clock,
    ) {
        self.task_status = task_status;
        self.data_operation = data_operation;
        self.data = data;
        self.updated_at = clock.utc();
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {}",
            self.task_name,
            self.data_operation.as_str(),
            self.data_unique_key
        )
    }
}
