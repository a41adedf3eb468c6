//! Status filters and sort orders for task listings.

use super::{Task, TaskStatus};
use serde::{Deserialize, Serialize};

/// Status filter for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// Every task.
    #[default]
    All,
    /// Open tasks only.
    Open,
    /// Claimed tasks only.
    Claimed,
    /// Tasks awaiting approval.
    Submitted,
    /// Completed tasks only.
    Completed,
    /// Disputed tasks only.
    Disputed,
}

impl StatusFilter {
    /// Returns `true` when the filter admits `status`.
    #[must_use]
    pub const fn matches(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Open => matches!(status, TaskStatus::Open),
            Self::Claimed => matches!(status, TaskStatus::Claimed),
            Self::Submitted => matches!(status, TaskStatus::Submitted),
            Self::Completed => matches!(status, TaskStatus::Completed),
            Self::Disputed => matches!(status, TaskStatus::Disputed),
        }
    }
}

/// Sort order for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSort {
    /// Highest reward first.
    #[default]
    RewardDesc,
    /// Nearest deadline first.
    DeadlineAsc,
}

/// Filter and sort applied to a snapshot of tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskQuery {
    /// Status filter.
    pub filter: StatusFilter,
    /// Sort order.
    pub sort: TaskSort,
}

impl TaskQuery {
    /// Creates a query.
    #[must_use]
    pub const fn new(filter: StatusFilter, sort: TaskSort) -> Self {
        Self { filter, sort }
    }

    /// Filters and sorts `tasks`, which must be in insertion order.
    ///
    /// The sort is stable: tasks with equal keys keep their relative order.
    #[must_use]
    pub fn apply(self, tasks: impl IntoIterator<Item = Task>) -> Vec<Task> {
        let mut selected: Vec<Task> = tasks
            .into_iter()
            .filter(|task| self.filter.matches(task.status()))
            .collect();
        match self.sort {
            TaskSort::RewardDesc => selected.sort_by(|a, b| b.reward().cmp(&a.reward())),
            TaskSort::DeadlineAsc => selected.sort_by_key(Task::deadline),
        }
        selected
    }
}
