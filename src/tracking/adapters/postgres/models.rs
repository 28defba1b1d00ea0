//! Diesel row models for task and record persistence.

use super::schema::{task_info, task_record};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for tasks.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_info)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Kind of scheduled work.
    pub task_type: String,
    /// Human-readable task name.
    pub task_name: String,
    /// Full-dataset or subset processing.
    pub task_mode: String,
    /// Free-form description.
    pub task_desc: String,
    /// Aggregate lifecycle status.
    pub task_status: String,
    /// Dataset classification.
    pub data_type: String,
    /// Structured configuration payload.
    pub task_params: Value,
    /// Aggregate statistics snapshot.
    pub task_statistics: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for tasks.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_info)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Kind of scheduled work.
    pub task_type: String,
    /// Human-readable task name.
    pub task_name: String,
    /// Full-dataset or subset processing.
    pub task_mode: String,
    /// Free-form description.
    pub task_desc: String,
    /// Aggregate lifecycle status.
    pub task_status: String,
    /// Dataset classification.
    pub data_type: String,
    /// Structured configuration payload.
    pub task_params: Value,
    /// Aggregate statistics snapshot.
    pub task_statistics: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for operation records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_record)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecordRow {
    /// Record identifier.
    pub id: uuid::Uuid,
    /// Owning task identifier.
    pub task_id: uuid::Uuid,
    /// Denormalized task name.
    pub task_name: String,
    /// Record-level outcome status.
    pub task_status: String,
    /// Denormalized dataset classification.
    pub data_type: String,
    /// Kind of data operation performed.
    pub data_operation: String,
    /// Caller-supplied idempotency key.
    pub data_unique_key: String,
    /// Structured operation payload.
    pub data: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for operation records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_record)]
pub struct NewRecordRow {
    /// Record identifier.
    pub id: uuid::Uuid,
    /// Owning task identifier.
    pub task_id: uuid::Uuid,
    /// Denormalized task name.
    pub task_name: String,
    /// Record-level outcome status.
    pub task_status: String,
    /// Denormalized dataset classification.
    pub data_type: String,
    /// Kind of data operation performed.
    pub data_operation: String,
    /// Caller-supplied idempotency key.
    pub data_unique_key: String,
    /// Structured operation payload.
    pub data: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
