//! In-memory store for lifecycle tests and single-process hosts.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::tracking::{
    domain::{PersistedRecordData, PersistedTaskData, Record, Task, TaskId},
    ports::{RecordStore, StoreError, StoreResult, TaskStatusUpdate, TaskStore},
};

/// Thread-safe in-memory implementation of both store ports.
///
/// The record uniqueness constraint and the compare-and-set status update
/// are enforced under one write lock, giving the same atomicity guarantees
/// the ports demand of a durable store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackingStore {
    state: Arc<RwLock<TrackingState>>,
}

#[derive(Debug, Default)]
struct TrackingState {
    tasks: HashMap<TaskId, PersistedTaskData>,
    records: HashMap<TaskId, BTreeMap<String, PersistedRecordData>>,
}

impl InMemoryTrackingStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn task_to_row(task: &Task) -> PersistedTaskData {
    PersistedTaskData {
        id: task.id(),
        task_type: task.task_type(),
        task_name: task.task_name().clone(),
        task_mode: task.task_mode(),
        task_desc: task.task_desc().clone(),
        task_status: task.status(),
        data_type: task.data_type().clone(),
        task_params: task.task_params().clone(),
        task_statistics: task.statistics().clone(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn record_to_row(record: &Record) -> PersistedRecordData {
    PersistedRecordData {
        id: record.id(),
        task_id: record.task_id(),
        task_name: record.task_name().clone(),
        task_status: record.status(),
        data_type: record.data_type().clone(),
        data_operation: record.data_operation(),
        data_unique_key: record.data_unique_key().clone(),
        data: record.data().clone(),
        created_at: record.created_at(),
        updated_at: record.updated_at(),
    }
}

fn lock_poisoned<T>(err: std::sync::PoisonError<T>) -> StoreError {
    StoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskStore for InMemoryTrackingStore {
    async fn create_task(&self, task: &Task) -> StoreResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(StoreError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task_to_row(task));
        Ok(())
    }

    async fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.tasks.get(&id).cloned().map(Task::from_persisted))
    }

    async fn update_task_status(&self, update: TaskStatusUpdate) -> StoreResult<bool> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let row = state
            .tasks
            .get_mut(&update.task_id)
            .ok_or(StoreError::TaskNotFound(update.task_id))?;
        if row.task_status != update.expected {
            return Ok(false);
        }
        row.task_status = update.new_status;
        row.task_statistics = update.statistics;
        row.updated_at = update.updated_at;
        Ok(true)
    }
}

#[async_trait]
impl RecordStore for InMemoryTrackingStore {
    async fn upsert_record(&self, record: &Record) -> StoreResult<Record> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.tasks.contains_key(&record.task_id()) {
            return Err(StoreError::TaskNotFound(record.task_id()));
        }

        let per_task = state.records.entry(record.task_id()).or_default();
        let key = record.data_unique_key().as_str().to_owned();
        let row = per_task
            .entry(key)
            .and_modify(|existing| {
                // Update in place: identity, denormalized fields, and
                // created_at stay as written by the first report.
                existing.task_status = record.status();
                existing.data_operation = record.data_operation();
                existing.data = record.data().clone();
                existing.updated_at = record.updated_at();
            })
            .or_insert_with(|| record_to_row(record));
        Ok(Record::from_persisted(row.clone()))
    }

    async fn list_records(&self, task_id: TaskId) -> StoreResult<Vec<Record>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .records
            .get(&task_id)
            .map(|per_task| {
                per_task
                    .values()
                    .cloned()
                    .map(Record::from_persisted)
                    .collect()
            })
            .unwrap_or_default())
    }
}
