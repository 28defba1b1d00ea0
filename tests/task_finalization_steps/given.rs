//! Given steps for task finalization BDD scenarios.

use super::world::{TaskFinalizationWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskledger::tracking::{
    domain::{DataOperation, TaskStatus},
    services::{CreateTaskRequest, ReportOperationRequest},
};

#[given("a running task")]
fn a_running_task(world: &mut TaskFinalizationWorld) -> Result<(), eyre::Report> {
    let created = run_async(world.manager.create_task(CreateTaskRequest::new(
        "data_sync",
        "full",
        "inventory-sync",
        "inventory",
    )))
    .wrap_err("create task for finalization scenario")?;
    let started = run_async(world.manager.start_task(created.id()))
        .wrap_err("start task for finalization scenario")?;
    world.running_task = Some(started);
    Ok(())
}

#[given(r#"the operation "{key}" was reported as "{status}""#)]
fn operation_reported(
    world: &mut TaskFinalizationWorld,
    key: String,
    status: String,
) -> Result<(), eyre::Report> {
    let task = world
        .running_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing running task in scenario world"))?;
    let record_status = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid record status in scenario: {err}"))?;

    run_async(world.tracker.report_operation(ReportOperationRequest::new(
        task.id(),
        key,
        DataOperation::Update,
        record_status,
    )))
    .wrap_err("report operation in scenario setup")?;
    Ok(())
}
