//! When steps for bounty lifecycle BDD scenarios.

use super::world::{BountyWorld, account, run_async};
use bounty_board::task::services::CreateTaskRequest;
use rstest_bdd_macros::when;

#[when(
    r#""{creator}" posts a task "{title}" with a reward of {reward:f64} units for {days:u32} days"#
)]
fn post_task(world: &mut BountyWorld, creator: String, title: String, reward: f64, days: u32) {
    let request = CreateTaskRequest::new(creator, title, "Posted by a scenario", reward, days);
    let result = run_async(world.service.create_task(request));
    world.record(result);
}

#[when(r#""{actor}" claims the task"#)]
fn claim_task(world: &mut BountyWorld, actor: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let claimant = account(actor)?;
    let result = run_async(world.service.claim_task(task_id, &claimant));
    world.record(result);
    Ok(())
}

#[when(r#""{actor}" submits proof "{uri}""#)]
fn submit_proof(world: &mut BountyWorld, actor: String, uri: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let submitter = account(actor)?;
    let result = run_async(world.service.submit_proof(task_id, &submitter, uri));
    world.record(result);
    Ok(())
}

#[when(r#""{actor}" approves the task"#)]
fn approve_task(world: &mut BountyWorld, actor: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let approver = account(actor)?;
    let result = run_async(world.service.approve_task(task_id, &approver));
    world.record(result);
    Ok(())
}

#[when(r#""{actor}" disputes the task"#)]
fn dispute_task(world: &mut BountyWorld, actor: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let disputer = account(actor)?;
    let result = run_async(world.service.dispute_task(task_id, &disputer));
    world.record(result);
    Ok(())
}
