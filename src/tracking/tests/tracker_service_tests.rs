//! Service orchestration tests for operation reporting.

use std::sync::Arc;

use crate::tracking::{
    adapters::memory::InMemoryTrackingStore,
    domain::{DataOperation, Task, TaskDomainError, TaskId, TaskStatus},
    services::{
        CreateTaskRequest, RecordTracker, RecordTrackerError, ReportOperationRequest,
        TaskLifecycleManager,
    },
};
use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::json;

struct Harness {
    manager: TaskLifecycleManager<InMemoryTrackingStore, DefaultClock>,
    tracker: RecordTracker<InMemoryTrackingStore, DefaultClock>,
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(InMemoryTrackingStore::new());
    let clock = Arc::new(DefaultClock);
    Harness {
        manager: TaskLifecycleManager::new(Arc::clone(&store), Arc::clone(&clock)),
        tracker: RecordTracker::new(store, clock),
    }
}

async fn running_task(harness: &Harness) -> Task {
    let created = harness
        .manager
        .create_task(CreateTaskRequest::new(
            "data_sync",
            "full",
            "inventory-sync",
            "inventory",
        ))
        .await
        .expect("task creation should succeed");
    harness
        .manager
        .start_task(created.id())
        .await
        .expect("task start should succeed")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn report_creates_record_with_denormalized_task_fields(harness: Harness) {
    let task = running_task(&harness).await;

    let record = harness
        .tracker
        .report_operation(
            ReportOperationRequest::new(
                task.id(),
                "sku-100",
                DataOperation::Update,
                TaskStatus::Success,
            )
            .with_data(json!({"synced": 4})),
        )
        .await
        .expect("report should succeed");

    assert_eq!(record.task_id(), task.id());
    assert_eq!(record.task_name(), task.task_name());
    assert_eq!(record.data_type(), task.data_type());
    assert_eq!(record.status(), TaskStatus::Success);
    assert_eq!(record.data(), &json!({"synced": 4}));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_reports_for_one_key_update_in_place(harness: Harness) {
    let task = running_task(&harness).await;

    let first = harness
        .tracker
        .report_operation(ReportOperationRequest::new(
            task.id(),
            "sku-100",
            DataOperation::Create,
            TaskStatus::Running,
        ))
        .await
        .expect("first report should succeed");

    let second = harness
        .tracker
        .report_operation(
            ReportOperationRequest::new(
                task.id(),
                "sku-100",
                DataOperation::Update,
                TaskStatus::Fail,
            )
            .with_data(json!({"error": "conflict"})),
        )
        .await
        .expect("second report should succeed");

    // Same logical record: identity and creation time survive the update.
    assert_eq!(second.id(), first.id());
    assert_eq!(second.created_at(), first.created_at());
    assert_eq!(second.status(), TaskStatus::Fail);
    assert_eq!(second.data_operation(), DataOperation::Update);
    assert_eq!(second.data(), &json!({"error": "conflict"}));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn redelivery_of_the_same_report_is_idempotent(harness: Harness) {
    let task = running_task(&harness).await;
    let request = ReportOperationRequest::new(
        task.id(),
        "sku-200",
        DataOperation::Delete,
        TaskStatus::Success,
    )
    .with_data(json!({"rows": 1}));

    let first = harness
        .tracker
        .report_operation(request.clone())
        .await
        .expect("first delivery should succeed");
    let second = harness
        .tracker
        .report_operation(request)
        .await
        .expect("redelivery should succeed");

    assert_eq!(second.id(), first.id());
    assert_eq!(second.status(), first.status());
    assert_eq!(second.data_operation(), first.data_operation());
    assert_eq!(second.data(), first.data());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn report_is_rejected_before_the_task_starts(harness: Harness) {
    let created = harness
        .manager
        .create_task(CreateTaskRequest::new("report", "part", "weekly", "orders"))
        .await
        .expect("task creation should succeed");

    let result = harness
        .tracker
        .report_operation(ReportOperationRequest::new(
            created.id(),
            "week-34",
            DataOperation::Query,
            TaskStatus::Success,
        ))
        .await;

    assert!(matches!(
        result,
        Err(RecordTrackerError::TaskNotRunning {
            status: TaskStatus::Wait,
            ..
        })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn report_is_rejected_after_finalization(harness: Harness) {
    let task = running_task(&harness).await;
    harness
        .tracker
        .report_operation(ReportOperationRequest::new(
            task.id(),
            "sku-1",
            DataOperation::Update,
            TaskStatus::Success,
        ))
        .await
        .expect("report should succeed");
    harness
        .manager
        .finalize_task(task.id(), Utc::now() + Duration::hours(1))
        .await
        .expect("finalize should succeed");

    let result = harness
        .tracker
        .report_operation(ReportOperationRequest::new(
            task.id(),
            "sku-2",
            DataOperation::Update,
            TaskStatus::Success,
        ))
        .await;

    assert!(matches!(
        result,
        Err(RecordTrackerError::TaskNotRunning {
            status: TaskStatus::Success,
            ..
        })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn report_for_unknown_task_is_rejected(harness: Harness) {
    let unknown = TaskId::new();

    let result = harness
        .tracker
        .report_operation(ReportOperationRequest::new(
            unknown,
            "key",
            DataOperation::Query,
            TaskStatus::Success,
        ))
        .await;

    assert!(matches!(
        result,
        Err(RecordTrackerError::TaskNotFound(id)) if id == unknown
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn report_with_empty_key_is_rejected(harness: Harness) {
    let task = running_task(&harness).await;

    let result = harness
        .tracker
        .report_operation(ReportOperationRequest::new(
            task.id(),
            "   ",
            DataOperation::Query,
            TaskStatus::Success,
        ))
        .await;

    assert!(matches!(
        result,
        Err(RecordTrackerError::Domain(
            TaskDomainError::EmptyDataUniqueKey
        ))
    ));
}
