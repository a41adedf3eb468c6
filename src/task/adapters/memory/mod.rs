//! In-memory adapters used by tests and local tooling.

mod settlement;
mod task;

pub use settlement::{InMemorySettlementGateway, SettlementReceipt};
pub use task::InMemoryTaskRepository;
