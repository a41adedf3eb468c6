//! Repository port for task storage and listing.

use crate::task::domain::{AccountId, Task, TaskDomainError, TaskId, TaskQuery};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Transition applied to a stored task by [`TaskRepository::update`].
pub type TaskMutator = Box<dyn FnOnce(&mut Task) -> Result<(), TaskDomainError> + Send>;

/// Task storage contract.
///
/// The repository owns task records exclusively. Updates are atomic: readers
/// observe either the record before a mutation or after it, never a
/// partially applied change.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn add(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Applies `mutator` to the stored task and returns the updated record.
    ///
    /// Nothing is stored when the mutator returns an error.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::Rejected`] when the mutator fails.
    async fn update(&self, id: TaskId, mutator: TaskMutator) -> TaskRepositoryResult<Task>;

    /// Returns a filtered, sorted snapshot of stored tasks.
    ///
    /// Tasks with equal sort keys keep their insertion order.
    async fn query(&self, query: TaskQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns all tasks where `account` is the creator or the claimant, in
    /// insertion order.
    async fn find_by_participant(&self, account: &AccountId) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The mutator refused the change.
    #[error(transparent)]
    Rejected(TaskDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
