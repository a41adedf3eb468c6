//! Then steps for bounty lifecycle BDD scenarios.

use super::world::{BountyWorld, parse_error_kind, run_async};
use bounty_board::task::domain::{StatusFilter, TaskSort};
use rstest_bdd_macros::then;

#[then("the task reward is {micro_units:u64} micro-units")]
fn task_reward_is(world: &BountyWorld, micro_units: u64) -> Result<(), eyre::Report> {
    let task = world
        .current_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no task has been posted in this scenario"))?;
    let actual = task.reward().micro_units();
    if actual != micro_units {
        return Err(eyre::eyre!("expected reward {micro_units}, found {actual}"));
    }
    Ok(())
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &BountyWorld, status: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let stored = run_async(world.service.find_task(task_id))
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?;
    if stored.status().as_str() != status {
        return Err(eyre::eyre!(
            "expected status {status}, found {}",
            stored.status().as_str()
        ));
    }
    Ok(())
}

#[then(r#"the task is claimed by "{worker}""#)]
fn task_claimed_by(world: &BountyWorld, worker: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let stored = run_async(world.service.find_task(task_id))
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?;
    match stored.claimant() {
        Some(claimant) if claimant.as_str() == worker => Ok(()),
        Some(claimant) => Err(eyre::eyre!(
            "expected claimant {worker}, found {}",
            claimant.as_str()
        )),
        None => Err(eyre::eyre!("expected claimant {worker}, found none")),
    }
}

#[then(r#"the operation is refused as "{wording}""#)]
fn operation_refused(world: &BountyWorld, wording: String) -> Result<(), eyre::Report> {
    let expected = parse_error_kind(&wording)?;
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no operation has been attempted in this scenario"))?;
    match result {
        Ok(task) => Err(eyre::eyre!(
            "expected {wording}, but the operation succeeded with status {}",
            task.status()
        )),
        Err(err) if err.kind() == expected => Ok(()),
        Err(err) => Err(eyre::eyre!("expected {wording}, found {:?}: {err}", err.kind())),
    }
}

#[then(r#""{worker}" has been paid {micro_units:u64} micro-units by "{creator}""#)]
fn worker_paid(
    world: &BountyWorld,
    worker: String,
    micro_units: u64,
    creator: String,
) -> Result<(), eyre::Report> {
    let receipts = world.gateway.receipts();
    let [receipt] = receipts.as_slice() else {
        return Err(eyre::eyre!(
            "expected exactly one settlement, found {}",
            receipts.len()
        ));
    };
    if receipt.payee.as_str() != worker || receipt.payer.as_str() != creator {
        return Err(eyre::eyre!(
            "expected transfer {creator} -> {worker}, found {} -> {}",
            receipt.payer.as_str(),
            receipt.payee.as_str()
        ));
    }
    if receipt.amount.micro_units() != micro_units {
        return Err(eyre::eyre!(
            "expected {micro_units} micro-units, found {}",
            receipt.amount.micro_units()
        ));
    }
    Ok(())
}

#[then("the board lists {count:usize} tasks")]
fn board_lists(world: &BountyWorld, count: usize) -> Result<(), eyre::Report> {
    let tasks = run_async(
        world
            .service
            .query_tasks(StatusFilter::All, TaskSort::RewardDesc),
    )
    .map_err(|err| eyre::eyre!("listing failed: {err}"))?;
    if tasks.len() != count {
        return Err(eyre::eyre!("expected {count} tasks, found {}", tasks.len()));
    }
    Ok(())
}
