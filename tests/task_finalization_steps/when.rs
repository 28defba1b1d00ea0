//! When steps for task finalization BDD scenarios.

use super::world::{TaskFinalizationWorld, run_async};
use chrono::{Duration, Utc};
use rstest_bdd_macros::when;

#[when("the task is finalized before the deadline")]
fn finalize_before_deadline(world: &mut TaskFinalizationWorld) -> Result<(), eyre::Report> {
    let task = world
        .running_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing running task in scenario world"))?;

    let result = run_async(
        world
            .manager
            .finalize_task(task.id(), Utc::now() + Duration::hours(1)),
    );
    world.last_finalize_result = Some(result);
    Ok(())
}

#[when("the task is finalized after the deadline has passed")]
fn finalize_after_deadline(world: &mut TaskFinalizationWorld) -> Result<(), eyre::Report> {
    let task = world
        .running_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing running task in scenario world"))?;

    let result = run_async(
        world
            .manager
            .finalize_task(task.id(), Utc::now() - Duration::hours(1)),
    );
    world.last_finalize_result = Some(result);
    Ok(())
}
