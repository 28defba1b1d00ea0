//! `PostgreSQL` store implementation for task lifecycle persistence.

use super::{
    models::{NewRecordRow, NewTaskRow, RecordRow, TaskRow},
    schema::{task_info, task_record},
};
use crate::tracking::{
    domain::{
        DataOperation, DataType, DataUniqueKey, PersistedRecordData, PersistedTaskData, Record,
        RecordId, Task, TaskDesc, TaskId, TaskMode, TaskName, TaskStatistics, TaskStatus, TaskType,
    },
    ports::{RecordStore, StoreError, StoreResult, TaskStatusUpdate, TaskStore},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::upsert::excluded;

/// `PostgreSQL` connection pool type used by tracking adapters.
pub type TrackingPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed implementation of both store ports.
///
/// The `(task_id, data_unique_key)` unique index provides upsert atomicity
/// and the conditional `UPDATE ... WHERE task_status = expected` provides
/// the compare-and-set, so multiple process instances can share one
/// database.
#[derive(Debug, Clone)]
pub struct PostgresTrackingStore {
    pool: TrackingPgPool,
}

impl PostgresTrackingStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TrackingPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(StoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(StoreError::persistence)?
    }
}

#[async_trait]
impl TaskStore for PostgresTrackingStore {
    async fn create_task(&self, task: &Task) -> StoreResult<()> {
        let task_id = task.id();
        let new_row = task_to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(task_info::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        StoreError::DuplicateTask(task_id)
                    }
                    _ => StoreError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = task_info::table
                .filter(task_info::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn update_task_status(&self, update: TaskStatusUpdate) -> StoreResult<bool> {
        let statistics =
            serde_json::to_value(&update.statistics).map_err(StoreError::persistence)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                task_info::table
                    .filter(task_info::id.eq(update.task_id.into_inner()))
                    .filter(task_info::task_status.eq(update.expected.as_str())),
            )
            .set((
                task_info::task_status.eq(update.new_status.as_str()),
                task_info::task_statistics.eq(statistics),
                task_info::updated_at.eq(update.updated_at),
            ))
            .execute(connection)
            .map_err(StoreError::persistence)?;
            if updated > 0 {
                return Ok(true);
            }

            // Zero rows is either a status mismatch or a missing task.
            let known = task_info::table
                .filter(task_info::id.eq(update.task_id.into_inner()))
                .select(task_info::id)
                .first::<uuid::Uuid>(connection)
                .optional()
                .map_err(StoreError::persistence)?;
            match known {
                Some(_) => Ok(false),
                None => Err(StoreError::TaskNotFound(update.task_id)),
            }
        })
        .await
    }
}

#[async_trait]
impl RecordStore for PostgresTrackingStore {
    async fn upsert_record(&self, record: &Record) -> StoreResult<Record> {
        let task_id = record.task_id();
        let new_row = record_to_new_row(record);

        self.run_blocking(move |connection| {
            let row = diesel::insert_into(task_record::table)
                .values(&new_row)
                .on_conflict((task_record::task_id, task_record::data_unique_key))
                .do_update()
                .set((
                    task_record::task_status.eq(excluded(task_record::task_status)),
                    task_record::data_operation.eq(excluded(task_record::data_operation)),
                    task_record::data.eq(excluded(task_record::data)),
                    task_record::updated_at.eq(excluded(task_record::updated_at)),
                ))
                .returning(RecordRow::as_returning())
                .get_result::<RecordRow>(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        StoreError::TaskNotFound(task_id)
                    }
                    _ => StoreError::persistence(err),
                })?;
            row_to_record(row)
        })
        .await
    }

    async fn list_records(&self, task_id: TaskId) -> StoreResult<Vec<Record>> {
        self.run_blocking(move |connection| {
            let rows = task_record::table
                .filter(task_record::task_id.eq(task_id.into_inner()))
                .select(RecordRow::as_select())
                .load::<RecordRow>(connection)
                .map_err(StoreError::persistence)?;
            rows.into_iter().map(row_to_record).collect()
        })
        .await
    }
}

fn task_to_new_row(task: &Task) -> StoreResult<NewTaskRow> {
    let task_statistics =
        serde_json::to_value(task.statistics()).map_err(StoreError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        task_type: task.task_type().as_str().to_owned(),
        task_name: task.task_name().as_str().to_owned(),
        task_mode: task.task_mode().as_str().to_owned(),
        task_desc: task.task_desc().as_str().to_owned(),
        task_status: task.status().as_str().to_owned(),
        data_type: task.data_type().as_str().to_owned(),
        task_params: task.task_params().clone(),
        task_statistics,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> StoreResult<Task> {
    let TaskRow {
        id,
        task_type,
        task_name,
        task_mode,
        task_desc,
        task_status,
        data_type,
        task_params,
        task_statistics,
        created_at,
        updated_at,
    } = row;

    let statistics =
        serde_json::from_value::<TaskStatistics>(task_statistics).map_err(StoreError::persistence)?;
    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        task_type: TaskType::try_from(task_type.as_str()).map_err(StoreError::persistence)?,
        task_name: TaskName::new(task_name).map_err(StoreError::persistence)?,
        task_mode: TaskMode::try_from(task_mode.as_str()).map_err(StoreError::persistence)?,
        task_desc: TaskDesc::new(task_desc).map_err(StoreError::persistence)?,
        task_status: TaskStatus::try_from(task_status.as_str()).map_err(StoreError::persistence)?,
        data_type: DataType::new(data_type).map_err(StoreError::persistence)?,
        task_params,
        task_statistics: statistics,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

fn record_to_new_row(record: &Record) -> NewRecordRow {
    NewRecordRow {
        id: record.id().into_inner(),
        task_id: record.task_id().into_inner(),
        task_name: record.task_name().as_str().to_owned(),
        task_status: record.status().as_str().to_owned(),
        data_type: record.data_type().as_str().to_owned(),
        data_operation: record.data_operation().as_str().to_owned(),
        data_unique_key: record.data_unique_key().as_str().to_owned(),
        data: record.data().clone(),
        created_at: record.created_at(),
        updated_at: record.updated_at(),
    }
}

fn row_to_record(row: RecordRow) -> StoreResult<Record> {
    let RecordRow {
        id,
        task_id,
        task_name,
        task_status,
        data_type,
        data_operation,
        data_unique_key,
        data,
        created_at,
        updated_at,
    } = row;

    let persisted = PersistedRecordData {
        id: RecordId::from_uuid(id),
        task_id: TaskId::from_uuid(task_id),
        task_name: TaskName::new(task_name).map_err(StoreError::persistence)?,
        task_status: TaskStatus::try_from(task_status.as_str()).map_err(StoreError::persistence)?,
        data_type: DataType::new(data_type).map_err(StoreError::persistence)?,
        data_operation: DataOperation::try_from(data_operation.as_str())
            .map_err(StoreError::persistence)?,
        data_unique_key: DataUniqueKey::new(data_unique_key).map_err(StoreError::persistence)?,
        data,
        created_at,
        updated_at,
    };
    Ok(Record::from_persisted(persisted))
}
