//! Shared world state for bounty lifecycle BDD scenarios.

use std::sync::Arc;

use bounty_board::task::{
    adapters::memory::{InMemorySettlementGateway, InMemoryTaskRepository},
    domain::{AccountId, Task, TaskId},
    services::{TaskErrorKind, TaskLifecycleResult, TaskLifecycleService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestBountyService =
    TaskLifecycleService<InMemoryTaskRepository, InMemorySettlementGateway, DefaultClock>;

/// Scenario world for bounty lifecycle behaviour tests.
pub struct BountyWorld {
    pub service: TestBountyService,
    pub gateway: Arc<InMemorySettlementGateway>,
    pub current_task: Option<Task>,
    pub last_result: Option<TaskLifecycleResult<Task>>,
}

impl BountyWorld {
    /// Creates a world with an empty board and ledger.
    #[must_use]
    pub fn new() -> Self {
        let gateway = Arc::new(InMemorySettlementGateway::new());
        let service = TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::clone(&gateway),
            Arc::new(DefaultClock),
        );
        Self {
            service,
            gateway,
            current_task: None,
            last_result: None,
        }
    }

    /// Identifier of the task the scenario is acting on.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been posted yet.
    pub fn task_id(&self) -> Result<TaskId, eyre::Report> {
        self.current_task
            .as_ref()
            .map(Task::id)
            .ok_or_else(|| eyre::eyre!("no task has been posted in this scenario"))
    }

    /// Stores an operation outcome, tracking the latest task snapshot.
    pub fn record(&mut self, result: TaskLifecycleResult<Task>) {
        if let Ok(task) = &result {
            self.current_task = Some(task.clone());
        }
        self.last_result = Some(result);
    }
}

impl Default for BountyWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BountyWorld {
    BountyWorld::default()
}

/// Parses an account name used in a step.
///
/// # Errors
///
/// Returns an error when the name is blank.
pub fn account(name: impl Into<String>) -> Result<AccountId, eyre::Report> {
    Ok(AccountId::new(name)?)
}

/// Maps the human-readable failure wording used in feature files.
///
/// # Errors
///
/// Returns an error for wording that names no known failure kind.
pub fn parse_error_kind(wording: &str) -> Result<TaskErrorKind, eyre::Report> {
    match wording {
        "validation failed" => Ok(TaskErrorKind::ValidationFailed),
        "not found" => Ok(TaskErrorKind::NotFound),
        "not authorized" => Ok(TaskErrorKind::NotAuthorized),
        "invalid transition" => Ok(TaskErrorKind::InvalidTransition),
        "operation in progress" => Ok(TaskErrorKind::OperationInProgress),
        "settlement failed" => Ok(TaskErrorKind::SettlementFailed),
        "persistence" => Ok(TaskErrorKind::Persistence),
        other => Err(eyre::eyre!("unknown failure kind '{other}'")),
    }
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
