//! Bounty task lifecycle management.
//!
//! Tasks are posted with a reward, claimed by another account, completed
//! with a proof reference, and approved by their creator, which releases
//! the reward through a settlement gateway. Either party may dispute a task
//! before it completes. The module follows hexagonal architecture:
//!
//! - Domain types and the state machine in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
