//! Unit tests for record reconciliation.

use crate::tracking::domain::{
    DataOperation, DataType, DataUniqueKey, Record, Task, TaskDesc, TaskMode, TaskName, TaskSpec,
    TaskStatus, TaskType,
};
use crate::tracking::services::reconcile_records;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn sync_task(clock: &DefaultClock) -> Task {
    let spec = TaskSpec {
        task_type: TaskType::DataSync,
        task_mode: TaskMode::Full,
        task_name: TaskName::new("inventory-sync").expect("valid task name"),
        task_desc: TaskDesc::new("").expect("valid description"),
        data_type: DataType::new("inventory").expect("valid data type"),
        task_params: json!({}),
    };
    Task::new(spec, clock)
}

fn records_with_statuses(clock: &DefaultClock, statuses: &[TaskStatus]) -> Vec<Record> {
    let task = sync_task(clock);
    statuses
        .iter()
        .enumerate()
        .map(|(index, status)| {
            let key = DataUniqueKey::new(format!("unit-{index}")).expect("valid key");
            Record::new(
                &task,
                key,
                DataOperation::Update,
                *status,
                json!({}),
                clock,
            )
        })
        .collect()
}

#[rstest]
fn empty_record_set_keeps_running_task_running(clock: DefaultClock) {
    let records = records_with_statuses(&clock, &[]);
    let outcome = reconcile_records(TaskStatus::Running, &records);

    assert_eq!(outcome.candidate, TaskStatus::Running);
    assert_eq!(outcome.statistics.total, 0);
}

#[rstest]
fn empty_record_set_leaves_waiting_task_unchanged(clock: DefaultClock) {
    let records = records_with_statuses(&clock, &[]);
    let outcome = reconcile_records(TaskStatus::Wait, &records);

    assert_eq!(outcome.candidate, TaskStatus::Wait);
}

#[rstest]
fn pending_records_win_over_every_other_rule(clock: DefaultClock) {
    let records = records_with_statuses(
        &clock,
        &[
            TaskStatus::Success,
            TaskStatus::Fail,
            TaskStatus::Timeout,
            TaskStatus::Running,
            TaskStatus::Wait,
        ],
    );
    let outcome = reconcile_records(TaskStatus::Running, &records);

    assert_eq!(outcome.candidate, TaskStatus::Running);
    assert_eq!(outcome.statistics.total, 5);
    assert_eq!(outcome.statistics.pending, 2);
    assert_eq!(outcome.statistics.succeeded, 1);
    assert_eq!(outcome.statistics.failed, 1);
    assert_eq!(outcome.statistics.timed_out, 1);
}

#[rstest]
fn all_failed_records_yield_fail(clock: DefaultClock) {
    let records = records_with_statuses(&clock, &[TaskStatus::Fail, TaskStatus::Fail]);
    let outcome = reconcile_records(TaskStatus::Running, &records);

    assert_eq!(outcome.candidate, TaskStatus::Fail);
    assert_eq!(outcome.statistics.failed, 2);
}

#[rstest]
fn all_succeeded_records_yield_success(clock: DefaultClock) {
    let records = records_with_statuses(
        &clock,
        &[TaskStatus::Success, TaskStatus::Success, TaskStatus::Success],
    );
    let outcome = reconcile_records(TaskStatus::Running, &records);

    assert_eq!(outcome.candidate, TaskStatus::Success);
    assert_eq!(outcome.statistics.total, 3);
    assert_eq!(outcome.statistics.succeeded, 3);
    assert_eq!(outcome.statistics.pending, 0);
}

#[rstest]
fn timed_out_records_with_nothing_pending_yield_timeout(clock: DefaultClock) {
    let records = records_with_statuses(
        &clock,
        &[TaskStatus::Success, TaskStatus::Timeout, TaskStatus::Fail],
    );
    let outcome = reconcile_records(TaskStatus::Running, &records);

    assert_eq!(outcome.candidate, TaskStatus::Timeout);
}

#[rstest]
fn mixed_outcomes_with_nothing_pending_yield_part(clock: DefaultClock) {
    let records = records_with_statuses(
        &clock,
        &[TaskStatus::Success, TaskStatus::Success, TaskStatus::Fail],
    );
    let outcome = reconcile_records(TaskStatus::Running, &records);

    assert_eq!(outcome.candidate, TaskStatus::Part);
    assert_eq!(outcome.statistics.succeeded, 2);
    assert_eq!(outcome.statistics.failed, 1);
}

#[rstest]
fn record_level_part_counts_toward_total_only(clock: DefaultClock) {
    let records = records_with_statuses(&clock, &[TaskStatus::Part, TaskStatus::Success]);
    let outcome = reconcile_records(TaskStatus::Running, &records);

    assert_eq!(outcome.statistics.total, 2);
    assert_eq!(outcome.statistics.succeeded, 1);
    assert_eq!(outcome.statistics.failed, 0);
    assert_eq!(outcome.statistics.pending, 0);
    // Not all succeeded, nothing failed or timed out: mixed.
    assert_eq!(outcome.candidate, TaskStatus::Part);
}

#[rstest]
fn reconcile_is_pure_over_an_unchanged_record_set(clock: DefaultClock) {
    let records = records_with_statuses(
        &clock,
        &[TaskStatus::Success, TaskStatus::Fail, TaskStatus::Running],
    );

    let first = reconcile_records(TaskStatus::Running, &records);
    let second = reconcile_records(TaskStatus::Running, &records);

    assert_eq!(first, second);
}
