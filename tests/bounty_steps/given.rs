//! Given steps for bounty lifecycle BDD scenarios.

use super::world::{BountyWorld, account, run_async};
use bounty_board::task::services::CreateTaskRequest;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(
    r#""{creator}" has posted a task "{title}" with a reward of {reward:f64} units for {days:u32} days"#
)]
fn task_posted(
    world: &mut BountyWorld,
    creator: String,
    title: String,
    reward: f64,
    days: u32,
) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(creator, title, "Posted by a scenario", reward, days);
    let task = run_async(world.service.create_task(request)).wrap_err("post scenario task")?;
    world.current_task = Some(task);
    Ok(())
}

#[given(r#""{worker}" has claimed the task"#)]
fn task_claimed(world: &mut BountyWorld, worker: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let claimant = account(worker)?;
    let task = run_async(world.service.claim_task(task_id, &claimant)).wrap_err("claim task")?;
    world.current_task = Some(task);
    Ok(())
}

#[given(r#""{worker}" has submitted proof "{uri}""#)]
fn proof_submitted(world: &mut BountyWorld, worker: String, uri: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let claimant = account(worker)?;
    let task = run_async(world.service.submit_proof(task_id, &claimant, uri))
        .wrap_err("submit proof")?;
    world.current_task = Some(task);
    Ok(())
}

#[given(r#"the settlement gateway rejects the next transfer with "{reason}""#)]
fn gateway_rejects_next(world: &mut BountyWorld, reason: String) {
    world.gateway.fail_next(reason);
}
