//! Domain model for batch task lifecycle tracking.
//!
//! The tracking domain models the task status state machine, per-operation
//! records keyed for idempotency, and the validated scalars both carry,
//! while keeping all infrastructure concerns outside of the domain boundary.

mod error;
mod ids;
mod record;
mod status;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{DataType, DataUniqueKey, RecordId, TaskDesc, TaskId, TaskName};
pub use record::{DataOperation, PersistedRecordData, Record};
pub use status::TaskStatus;
pub use task::{PersistedTaskData, Task, TaskMode, TaskSpec, TaskStatistics, TaskType};
