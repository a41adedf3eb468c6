//! Concurrency tests for approval serialisation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bounty_board::task::{
    adapters::memory::{InMemorySettlementGateway, InMemoryTaskRepository},
    domain::{AccountId, Task, TaskId, TaskQuery, TaskStatus},
    ports::{TaskMutator, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
    services::{CreateTaskRequest, TaskErrorKind, TaskLifecycleService},
};
use eyre::{WrapErr, ensure};
use mockable::DefaultClock;
use rstest::rstest;
use tokio::sync::{Notify, Semaphore};

use super::helpers::{CREATOR, WORKER, account, service_with, submitted};

/// Repository that can pause the next `update` until released.
struct GatedRepository {
    inner: InMemoryTaskRepository,
    armed: AtomicBool,
    entered: Notify,
    release: Semaphore,
}

impl GatedRepository {
    fn new() -> Self {
        Self {
            inner: InMemoryTaskRepository::new(),
            armed: AtomicBool::new(false),
            entered: Notify::new(),
            release: Semaphore::new(0),
        }
    }

    fn pause_next_update(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    async fn wait_for_paused_update(&self) {
        self.entered.notified().await;
    }

    fn resume_update(&self) {
        self.release.add_permits(1);
    }
}

#[async_trait]
impl TaskRepository for GatedRepository {
    async fn add(&self, task: &Task) -> TaskRepositoryResult<()> {
        self.inner.add(task).await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.inner.find_by_id(id).await
    }

    async fn update(&self, id: TaskId, mutator: TaskMutator) -> TaskRepositoryResult<Task> {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.release
                .acquire()
                .await
                .map_err(TaskRepositoryError::persistence)?
                .forget();
        }
        self.inner.update(id, mutator).await
    }

    async fn query(&self, query: TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        self.inner.query(query).await
    }

    async fn find_by_participant(&self, account: &AccountId) -> TaskRepositoryResult<Vec<Task>> {
        self.inner.find_by_participant(account).await
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overlapping_approvals_settle_once() -> eyre::Result<()> {
    let (service, gateway) = service_with(InMemorySettlementGateway::held());
    let creator = account(CREATOR)?;
    let task_id = submitted(&service).await?.id();

    let first = tokio::spawn({
        let service = service.clone();
        let creator = creator.clone();
        async move { service.approve_task(task_id, &creator).await }
    });
    gateway.wait_for_pending_transfer().await;

    let pending = service.find_task(task_id).await?;
    ensure!(pending.status() == TaskStatus::Submitted);

    let second = service.approve_task(task_id, &creator).await;
    ensure!(second.map_err(|err| err.kind()).err() == Some(TaskErrorKind::OperationInProgress));

    let dispute = service.dispute_task(task_id, &creator).await;
    ensure!(dispute.map_err(|err| err.kind()).err() == Some(TaskErrorKind::OperationInProgress));

    gateway.release_transfers(1);
    let completed = first.await.wrap_err("approval task panicked")??;

    ensure!(completed.status() == TaskStatus::Completed);
    ensure!(gateway.receipts().len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn abandoned_approval_leaves_task_submitted() -> eyre::Result<()> {
    let (service, gateway) = service_with(InMemorySettlementGateway::held());
    let creator = account(CREATOR)?;
    let task_id = submitted(&service).await?.id();

    let abandoned = tokio::spawn({
        let service = service.clone();
        let creator = creator.clone();
        async move { service.approve_task(task_id, &creator).await }
    });
    gateway.wait_for_pending_transfer().await;
    abandoned.abort();
    let outcome = abandoned.await;
    ensure!(outcome.is_err_and(|err| err.is_cancelled()));

    let stored = service.find_task(task_id).await?;
    ensure!(stored.status() == TaskStatus::Submitted);
    ensure!(gateway.receipts().is_empty());

    gateway.release_transfers(1);
    let completed = service.approve_task(task_id, &creator).await?;
    ensure!(completed.status() == TaskStatus::Completed);
    ensure!(gateway.receipts().len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approval_waits_out_a_committing_dispute() -> eyre::Result<()> {
    let repository = Arc::new(GatedRepository::new());
    let gateway = Arc::new(InMemorySettlementGateway::new());
    let service = TaskLifecycleService::new(
        Arc::clone(&repository),
        Arc::clone(&gateway),
        Arc::new(DefaultClock),
    );
    let creator = account(CREATOR)?;
    let worker = account(WORKER)?;
    let task_id = service
        .create_task(CreateTaskRequest::new(CREATOR, "Design a poster", "Two sizes", 15.0, 5))
        .await?
        .id();
    service.claim_task(task_id, &worker).await?;
    service.submit_proof(task_id, &worker, "ipfs://QmPoster").await?;

    repository.pause_next_update();
    let dispute = tokio::spawn({
        let service = service.clone();
        let worker = worker.clone();
        async move { service.dispute_task(task_id, &worker).await }
    });
    repository.wait_for_paused_update().await;

    let approval = service.approve_task(task_id, &creator).await;
    ensure!(approval.map_err(|err| err.kind()).err() == Some(TaskErrorKind::OperationInProgress));
    ensure!(gateway.receipts().is_empty());

    repository.resume_update();
    let disputed = dispute.await.wrap_err("dispute task panicked")??;
    ensure!(disputed.status() == TaskStatus::Disputed);

    let late = service.approve_task(task_id, &creator).await;
    ensure!(late.map_err(|err| err.kind()).err() == Some(TaskErrorKind::InvalidTransition));
    ensure!(gateway.receipts().is_empty());
    Ok(())
}
