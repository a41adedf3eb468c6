//! Domain model for bounty task lifecycle management.
//!
//! The task domain models posting, claiming, proof submission, approval and
//! dispute of bounty tasks while keeping all infrastructure concerns, such
//! as storage and value transfer, outside of the domain boundary.

mod deadline;
mod error;
mod ids;
mod policy;
mod query;
mod reward;
mod task;

pub use deadline::TimeRemaining;
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{AccountId, ProofUri, TaskId, TransactionId};
pub use policy::{REWARD_FLOOR_MICRO_UNITS, TaskPostingPolicy};
pub use query::{StatusFilter, TaskQuery, TaskSort};
pub use reward::{MICRO_UNITS_PER_UNIT, RewardAmount};
pub use task::{NewTask, PersistedTaskData, SettlementTerms, Task, TaskEvent, TaskStatus};
