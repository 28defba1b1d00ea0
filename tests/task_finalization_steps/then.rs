//! Then steps for task finalization BDD scenarios.

use super::world::TaskFinalizationWorld;
use rstest_bdd_macros::then;
use taskledger::tracking::domain::{Task, TaskStatus};

fn finalized_task(world: &TaskFinalizationWorld) -> Result<&Task, eyre::Report> {
    match world
        .last_finalize_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing finalize result"))?
    {
        Ok(task) => Ok(task),
        Err(err) => Err(eyre::eyre!("finalize failed in scenario: {err}")),
    }
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskFinalizationWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = finalized_task(world)?;

    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            task.status().as_str()
        ));
    }
    Ok(())
}

#[then("the statistics show {total:u64} total, {succeeded:u64} succeeded, {failed:u64} failed, {pending:u64} pending")]
fn statistics_show(
    world: &TaskFinalizationWorld,
    total: u64,
    succeeded: u64,
    failed: u64,
    pending: u64,
) -> Result<(), eyre::Report> {
    let task = finalized_task(world)?;
    let statistics = task.statistics();

    let observed = (
        statistics.total,
        statistics.succeeded,
        statistics.failed,
        statistics.pending,
    );
    let expected = (total, succeeded, failed, pending);
    if observed != expected {
        return Err(eyre::eyre!(
            "expected statistics {expected:?}, found {observed:?}"
        ));
    }
    Ok(())
}
