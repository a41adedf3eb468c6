//! Service layer for posting, claiming, submitting, approving and disputing
//! bounty tasks.

use crate::task::{
    domain::{
        AccountId, NewTask, ProofUri, RewardAmount, StatusFilter, Task, TaskDomainError, TaskId,
        TaskPostingPolicy, TaskQuery, TaskSort, TaskStatus,
    },
    ports::{SettlementError, SettlementGateway, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use super::in_flight::InFlightApprovals;

/// Request payload for posting a task.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTaskRequest {
    creator: String,
    title: String,
    description: String,
    reward_major_units: f64,
    duration_days: u32,
}

impl CreateTaskRequest {
    /// Creates a request. The reward is given in major currency units.
    #[must_use]
    pub fn new(
        creator: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        reward_major_units: f64,
        duration_days: u32,
    ) -> Self {
        Self {
            creator: creator.into(),
            title: title.into(),
            description: description.into(),
            reward_major_units,
            duration_days,
        }
    }
}

/// Participation counts for one account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountSummary {
    /// Tasks posted by the account.
    pub created: usize,
    /// Tasks the account has claimed, in any later status.
    pub claimed: usize,
    /// Tasks the account claimed that have been paid out.
    pub completed: usize,
}

/// Error categories surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskErrorKind {
    /// Input shape or range was rejected.
    ValidationFailed,
    /// The task does not exist.
    NotFound,
    /// The actor has no standing for the action.
    NotAuthorized,
    /// The action is not legal from the task's status.
    InvalidTransition,
    /// An approval for the task is already running.
    OperationInProgress,
    /// The value transfer failed.
    SettlementFailed,
    /// Storage failed or holds inconsistent data.
    Persistence,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or transition rule failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
    /// The settlement gateway did not confirm the transfer.
    #[error(transparent)]
    Settlement(#[from] SettlementError),
    /// Another approval of the same task is in progress.
    #[error("an approval for task {0} is already in progress")]
    OperationInProgress(TaskId),
}

impl From<TaskRepositoryError> for TaskLifecycleError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::Rejected(domain) => Self::Domain(domain),
            other => Self::Repository(other),
        }
    }
}

impl TaskLifecycleError {
    /// Classifies the error for presentation.
    #[must_use]
    pub const fn kind(&self) -> TaskErrorKind {
        match self {
            Self::Domain(TaskDomainError::NotAuthorized { .. }) => TaskErrorKind::NotAuthorized,
            Self::Domain(TaskDomainError::InvalidTransition { .. }) => {
                TaskErrorKind::InvalidTransition
            }
            Self::Domain(TaskDomainError::CorruptRecord { .. })
            | Self::Repository(
                TaskRepositoryError::Persistence(_)
                | TaskRepositoryError::DuplicateTask(_)
                | TaskRepositoryError::Rejected(_),
            ) => TaskErrorKind::Persistence,
            Self::Domain(_) => TaskErrorKind::ValidationFailed,
            Self::Repository(TaskRepositoryError::NotFound(_)) => TaskErrorKind::NotFound,
            Self::Settlement(_) => TaskErrorKind::SettlementFailed,
            Self::OperationInProgress(_) => TaskErrorKind::OperationInProgress,
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Applies the bounty state machine to tasks held by the repository. The
/// only externally visible side effect is the settlement transfer on
/// approval, which always completes before the task is marked completed.
pub struct TaskLifecycleService<R, G, C>
where
    R: TaskRepository,
    G: SettlementGateway,
    C: Clock + Send + Sync + 'static,
{
    repository: Arc<R>,
    gateway: Arc<G>,
    clock: Arc<C>,
    policy: TaskPostingPolicy,
    approvals: InFlightApprovals,
}

impl<R, G, C> Clone for TaskLifecycleService<R, G, C>
where
    R: TaskRepository,
    G: SettlementGateway,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            gateway: Arc::clone(&self.gateway),
            clock: Arc::clone(&self.clock),
            policy: self.policy.clone(),
            approvals: self.approvals.clone(),
        }
    }
}

impl<R, G, C> TaskLifecycleService<R, G, C>
where
    R: TaskRepository,
    G: SettlementGateway,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a service with the default posting policy.
    #[must_use]
    pub fn new(repository: Arc<R>, gateway: Arc<G>, clock: Arc<C>) -> Self {
        Self {
            repository,
            gateway,
            clock,
            policy: TaskPostingPolicy::default(),
            approvals: InFlightApprovals::new(),
        }
    }

    /// Replaces the posting policy.
    #[must_use]
    pub fn with_policy(mut self, policy: TaskPostingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the active posting policy.
    #[must_use]
    pub const fn policy(&self) -> &TaskPostingPolicy {
        &self.policy
    }

    /// Posts a new open task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when validation fails or
    /// [`TaskLifecycleError::Repository`] when the task cannot be stored.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let creator = AccountId::new(request.creator)?;
        let reward = RewardAmount::from_major(request.reward_major_units)?;
        let task = Task::post(
            NewTask {
                creator,
                title: request.title,
                description: request.description,
                reward,
                duration_days: request.duration_days,
            },
            &self.policy,
            &*self.clock,
        )?;
        self.repository.add(&task).await?;
        info!(
            task_id = %task.id(),
            creator = %task.creator(),
            reward = %task.reward(),
            deadline = %task.deadline(),
            "Task posted"
        );
        Ok(task)
    }

    /// Returns the task with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] (wrapped) when the task does
    /// not exist.
    pub async fn find_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::Repository(TaskRepositoryError::NotFound(task_id)))
    }

    /// Claims an open task for `actor`.
    ///
    /// # Errors
    ///
    /// Returns a not-found, not-authorized (creator claiming their own task)
    /// or invalid-transition error.
    pub async fn claim_task(&self, task_id: TaskId, actor: &AccountId) -> TaskLifecycleResult<Task> {
        let clock = Arc::clone(&self.clock);
        let claimant = actor.clone();
        let task = self
            .repository
            .update(
                task_id,
                Box::new(move |task: &mut Task| task.claim(&claimant, &*clock)),
            )
            .await?;
        info!(task_id = %task_id, claimant = %actor, status = %task.status(), "Task claimed");
        Ok(task)
    }

    /// Records proof of completion from the claimant.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty URI, or a not-found,
    /// not-authorized or invalid-transition error.
    pub async fn submit_proof(
        &self,
        task_id: TaskId,
        actor: &AccountId,
        proof_uri: impl Into<String>,
    ) -> TaskLifecycleResult<Task> {
        let proof = ProofUri::new(proof_uri)?;
        let clock = Arc::clone(&self.clock);
        let claimant = actor.clone();
        let task = self
            .repository
            .update(
                task_id,
                Box::new(move |task: &mut Task| task.submit_proof(&claimant, proof, &*clock)),
            )
            .await?;
        info!(
            task_id = %task_id,
            claimant = %actor,
            proof_uri = task.submission_uri().map(ProofUri::as_str).unwrap_or_default(),
            "Proof submitted"
        );
        Ok(task)
    }

    /// Approves a submitted task and releases the reward to the claimant.
    ///
    /// The settlement transfer is awaited first; the task is marked completed
    /// only after the gateway confirms it. A failed transfer leaves the task
    /// submitted so the approval can be retried. Approvals of the same task
    /// never overlap.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::OperationInProgress`] while another
    /// approval of the task is running, [`TaskLifecycleError::Settlement`]
    /// when the transfer fails, or a not-found, not-authorized or
    /// invalid-transition error.
    pub async fn approve_task(
        &self,
        task_id: TaskId,
        actor: &AccountId,
    ) -> TaskLifecycleResult<Task> {
        let Some(_guard) = self.approvals.try_begin(task_id) else {
            warn!(task_id = %task_id, actor = %actor, "Approval already in progress");
            return Err(TaskLifecycleError::OperationInProgress(task_id));
        };

        let terms = self.find_task(task_id).await?.settlement_terms(actor)?;
        info!(
            task_id = %task_id,
            payer = %terms.payer,
            payee = %terms.payee,
            amount = %terms.amount,
            "Releasing reward"
        );

        let transaction_id = match self
            .gateway
            .transfer(&terms.payer, &terms.payee, terms.amount)
            .await
        {
            Ok(transaction_id) => transaction_id,
            Err(err) => {
                warn!(task_id = %task_id, error = %err, "Settlement failed; task stays submitted");
                return Err(err.into());
            }
        };

        let clock = Arc::clone(&self.clock);
        let approver = actor.clone();
        let tx_id = transaction_id.clone();
        let result = self
            .repository
            .update(
                task_id,
                Box::new(move |task: &mut Task| task.complete(&approver, tx_id, &*clock)),
            )
            .await;

        match result {
            Ok(task) => {
                info!(task_id = %task_id, tx_id = %transaction_id, "Task completed");
                Ok(task)
            }
            Err(err) => {
                error!(
                    task_id = %task_id,
                    tx_id = %transaction_id,
                    error = %err,
                    "Settlement confirmed but completion was not recorded"
                );
                Err(err.into())
            }
        }
    }

    /// Moves a task into dispute.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::OperationInProgress`] while an approval
    /// of the task is settling, or a not-found, not-authorized or invalid-transition
    /// error.
    pub async fn dispute_task(
        &self,
        task_id: TaskId,
        actor: &AccountId,
    ) -> TaskLifecycleResult<Task> {
        // Held until the dispute commits so no approval can start settling.
        let Some(_guard) = self.approvals.try_begin(task_id) else {
            warn!(task_id = %task_id, actor = %actor, "Dispute blocked by pending approval");
            return Err(TaskLifecycleError::OperationInProgress(task_id));
        };
        let clock = Arc::clone(&self.clock);
        let disputant = actor.clone();
        let task = self
            .repository
            .update(
                task_id,
                Box::new(move |task: &mut Task| task.dispute(&disputant, &*clock)),
            )
            .await?;
        info!(task_id = %task_id, actor = %actor, "Task disputed");
        Ok(task)
    }

    /// Lists tasks matching `filter`, ordered by `sort`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the listing fails.
    pub async fn query_tasks(
        &self,
        filter: StatusFilter,
        sort: TaskSort,
    ) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.query(TaskQuery::new(filter, sort)).await?)
    }

    /// Lists tasks posted by `account` in posting order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn tasks_created_by(&self, account: &AccountId) -> TaskLifecycleResult<Vec<Task>> {
        let tasks = self.repository.find_by_participant(account).await?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.creator() == account)
            .collect())
    }

    /// Summarises the participation of `account`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn account_summary(&self, account: &AccountId) -> TaskLifecycleResult<AccountSummary> {
        let tasks = self.repository.find_by_participant(account).await?;
        Ok(tasks.iter().fold(AccountSummary::default(), |mut summary, task| {
            if task.creator() == account {
                summary.created += 1;
            }
            if task.claimant() == Some(account) {
                summary.claimed += 1;
                if task.status() == TaskStatus::Completed {
                    summary.completed += 1;
                }
            }
            summary
        }))
    }
}
