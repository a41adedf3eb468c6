//! Per-task serialisation of approvals and disputes.

use crate::task::domain::TaskId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Set of tasks with a settling approval or a committing dispute.
#[derive(Debug, Clone, Default)]
pub struct InFlightApprovals {
    active: Arc<Mutex<HashSet<TaskId>>>,
}

impl InFlightApprovals {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `task_id` as in flight.
    ///
    /// Returns `None` when an approval or dispute of the task is already
    /// running. The mark is cleared when the returned guard is dropped,
    /// including when the owning future is abandoned.
    #[must_use]
    pub fn try_begin(&self, task_id: TaskId) -> Option<ApprovalGuard> {
        let mut active = self
            .active
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if !active.insert(task_id) {
            return None;
        }
        Some(ApprovalGuard {
            active: Arc::clone(&self.active),
            task_id,
        })
    }
}

/// Clears the in-flight mark for one task on drop.
#[derive(Debug)]
pub struct ApprovalGuard {
    active: Arc<Mutex<HashSet<TaskId>>>,
    task_id: TaskId,
}

impl Drop for ApprovalGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(&self.task_id);
    }
}
