//! Error types for tracking domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating domain tracking values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task type label is not a recognized variant.
    #[error("unknown task type: {0}")]
    UnknownTaskType(String),

    /// The task mode label is not a recognized variant.
    #[error("unknown task mode: {0}")]
    UnknownTaskMode(String),

    /// The data operation label is not a recognized variant.
    #[error("unknown data operation: {0}")]
    UnknownDataOperation(String),

    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The task name exceeds the persisted column width.
    #[error("task name is {0} characters, maximum is 128")]
    TaskNameTooLong(usize),

    /// The task description exceeds the persisted column width.
    #[error("task description is {0} characters, maximum is 512")]
    TaskDescTooLong(usize),

    /// The data type classification is empty after trimming.
    #[error("data type must not be empty")]
    EmptyDataType,

    /// The data type classification exceeds the persisted column width.
    #[error("data type is {0} characters, maximum is 64")]
    DataTypeTooLong(usize),

    /// The data unique key is empty after trimming.
    #[error("data unique key must not be empty")]
    EmptyDataUniqueKey,

    /// The data unique key exceeds the persisted column width.
    #[error("data unique key is {0} characters, maximum is 256")]
    DataUniqueKeyTooLong(usize),

    /// The requested status transition is not permitted by the state machine.
    #[error("invalid status transition for task {task_id}: {from:?} -> {to:?}")]
    InvalidStateTransition {
        /// Task whose transition was rejected.
        task_id: TaskId,
        /// Status the task currently holds.
        from: TaskStatus,
        /// Status the caller attempted to move to.
        to: TaskStatus,
    },

    /// The task already holds a terminal status.
    #[error("task {task_id} is already finalized with status {status:?}")]
    AlreadyFinalized {
        /// Task whose mutation was rejected.
        task_id: TaskId,
        /// Terminal status the task holds.
        status: TaskStatus,
    },

    /// The task is not in the running window required for the operation.
    #[error("task {task_id} is not running (status {status:?})")]
    NotRunning {
        /// Task whose mutation was rejected.
        task_id: TaskId,
        /// Status the task currently holds.
        status: TaskStatus,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
