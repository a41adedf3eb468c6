//! Port contracts for bounty task management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod repository;
pub mod settlement;

pub use repository::{TaskMutator, TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use settlement::{SettlementError, SettlementGateway, SettlementResult};

#[cfg(test)]
pub use settlement::MockSettlementGateway;
