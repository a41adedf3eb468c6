//! Walks one bounty task through its full lifecycle against the in-memory
//! adapters, logging every step.
//!
//! Usage:
//!
//! ```text
//! bounty-board-demo [policy-path]
//! ```
//!
//! The optional `policy-path` names a JSON document with posting limits, for
//! example:
//!
//! ```json
//! { "min_reward_micro_units": 500000, "max_duration_days": 30 }
//! ```
//!
//! Set `RUST_LOG=info` to see the lifecycle events.

use std::env;
use std::fs;
use std::sync::Arc;

use bounty_board::task::{
    adapters::memory::{InMemorySettlementGateway, InMemoryTaskRepository},
    domain::{AccountId, StatusFilter, TaskDomainError, TaskPostingPolicy, TaskSort},
    services::{CreateTaskRequest, TaskLifecycleError, TaskLifecycleService},
};
use mockable::DefaultClock;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while running the demo.
#[derive(Debug, Error)]
enum DemoError {
    #[error("failed to read policy: {0}")]
    PolicyRead(#[source] std::io::Error),
    #[error("failed to parse policy: {0}")]
    PolicyParse(#[source] serde_json::Error),
    #[error("invalid account: {0}")]
    Account(#[source] TaskDomainError),
    #[error("lifecycle step failed: {0}")]
    Lifecycle(#[from] TaskLifecycleError),
}

fn load_policy() -> Result<TaskPostingPolicy, DemoError> {
    let Some(path) = env::args().nth(1) else {
        return Ok(TaskPostingPolicy::default());
    };
    let document = fs::read_to_string(&path).map_err(DemoError::PolicyRead)?;
    TaskPostingPolicy::from_json(&document).map_err(DemoError::PolicyParse)
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    run().await.map_err(Into::into)
}

async fn run() -> Result<(), DemoError> {
    let policy = load_policy()?;
    let gateway = Arc::new(InMemorySettlementGateway::new());
    let service = TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::clone(&gateway),
        Arc::new(DefaultClock),
    )
    .with_policy(policy);

    let poster = AccountId::new("poster-account").map_err(DemoError::Account)?;
    let worker = AccountId::new("worker-account").map_err(DemoError::Account)?;

    let task = service
        .create_task(CreateTaskRequest::new(
            poster.as_str(),
            "Proofread my essay",
            "Proofread a 2000-word essay on Renaissance art.",
            5.0,
            7,
        ))
        .await?;
    info!(
        task_id = %task.id(),
        reward = %task.reward(),
        time_remaining = %task.time_remaining(&DefaultClock),
        "Demo task posted"
    );

    service.claim_task(task.id(), &worker).await?;
    service
        .submit_proof(task.id(), &worker, "ipfs://Qm123")
        .await?;
    let completed = service.approve_task(task.id(), &poster).await?;

    let listed = service
        .query_tasks(StatusFilter::Completed, TaskSort::RewardDesc)
        .await?;
    let summary = service.account_summary(&worker).await?;
    info!(
        status = %completed.status(),
        completed_tasks = listed.len(),
        worker_completed = summary.completed,
        receipts = gateway.receipts().len(),
        "Demo finished"
    );
    Ok(())
}
