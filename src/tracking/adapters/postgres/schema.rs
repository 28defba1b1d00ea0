//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Tasks with aggregate status, parameters, and statistics.
    task_info (id) {
        /// Task identifier.
        id -> Uuid,
        /// Kind of scheduled work.
        #[max_length = 64]
        task_type -> Varchar,
        /// Human-readable task name.
        #[max_length = 128]
        task_name -> Varchar,
        /// Full-dataset or subset processing.
        #[max_length = 32]
        task_mode -> Varchar,
        /// Free-form description.
        #[max_length = 512]
        task_desc -> Varchar,
        /// Aggregate lifecycle status.
        #[max_length = 32]
        task_status -> Varchar,
        /// Dataset classification.
        #[max_length = 64]
        data_type -> Varchar,
        /// Structured configuration payload.
        task_params -> Jsonb,
        /// Aggregate statistics snapshot.
        task_statistics -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-operation records, unique on `(task_id, data_unique_key)`.
    task_record (id) {
        /// Record identifier.
        id -> Uuid,
        /// Owning task identifier.
        task_id -> Uuid,
        /// Task name denormalized at record-creation time.
        #[max_length = 128]
        task_name -> Varchar,
        /// Record-level outcome status.
        #[max_length = 32]
        task_status -> Varchar,
        /// Dataset classification denormalized at record-creation time.
        #[max_length = 64]
        data_type -> Varchar,
        /// Kind of data operation performed.
        #[max_length = 64]
        data_operation -> Varchar,
        /// Caller-supplied idempotency key.
        #[max_length = 256]
        data_unique_key -> Varchar,
        /// Structured operation payload.
        data -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(task_record -> task_info (task_id));
diesel::allow_tables_to_appear_in_same_query!(task_info, task_record);
