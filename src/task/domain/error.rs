//! Error types for task domain validation and parsing.

use super::{AccountId, TaskEvent, TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or transitioning domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the configured character limit.
    #[error("task title is {actual} characters, maximum is {max}")]
    TitleTooLong {
        /// Configured maximum.
        max: usize,
        /// Observed length in characters.
        actual: usize,
    },

    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The reward is not a finite, positive number of major units.
    #[error("reward must be a finite positive amount")]
    InvalidReward,

    /// The reward is below the posting minimum.
    #[error("reward of {actual} micro-units is below the minimum of {minimum}")]
    RewardBelowMinimum {
        /// Minimum accepted reward in micro-units.
        minimum: u64,
        /// Requested reward in micro-units.
        actual: u64,
    },

    /// The requested task duration is outside the accepted range.
    #[error("duration of {days} days is outside the range {min}..={max}")]
    DurationOutOfRange {
        /// Requested duration.
        days: u32,
        /// Shortest accepted duration.
        min: u32,
        /// Longest accepted duration.
        max: u32,
    },

    /// The proof-of-completion reference is empty.
    #[error("proof URI must not be empty")]
    EmptyProofUri,

    /// An account identifier is empty.
    #[error("account identifier must not be empty")]
    EmptyAccountId,

    /// The actor has no standing to perform the event on this task.
    #[error("account {actor} is not authorized to {event} task {task_id}")]
    NotAuthorized {
        /// Task being acted upon.
        task_id: TaskId,
        /// Account attempting the action.
        actor: AccountId,
        /// Attempted event.
        event: TaskEvent,
    },

    /// The event is not legal from the task's current status.
    #[error("cannot {event} task {task_id} while it is {from}")]
    InvalidTransition {
        /// Task being acted upon.
        task_id: TaskId,
        /// Status at the time of the attempt.
        from: TaskStatus,
        /// Attempted event.
        event: TaskEvent,
    },

    /// Persisted task data violates a task invariant.
    #[error("persisted task {task_id} is inconsistent: {detail}")]
    CorruptRecord {
        /// Offending task.
        task_id: TaskId,
        /// Which invariant failed.
        detail: &'static str,
    },
}

impl TaskDomainError {
    /// Returns `true` for input-shape and range failures.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyTitle
                | Self::TitleTooLong { .. }
                | Self::EmptyDescription
                | Self::InvalidReward
                | Self::RewardBelowMinimum { .. }
                | Self::DurationOutOfRange { .. }
                | Self::EmptyProofUri
                | Self::EmptyAccountId
        )
    }
}

/// Error returned while parsing task statuses from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
