//! Application services for bounty task orchestration.

mod in_flight;
mod lifecycle;

pub use in_flight::{ApprovalGuard, InFlightApprovals};
pub use lifecycle::{
    AccountSummary, CreateTaskRequest, TaskErrorKind, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService,
};
