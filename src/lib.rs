//! Bounty board: task lifecycle and settlement coordination.
//!
//! This crate provides the core of a bounty board, where participants post
//! tasks with monetary rewards, claim them, submit proof of completion, and
//! release payment on approval. Rendering and wallet integration live
//! outside this crate and call into the lifecycle service.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and value transfer
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`task`]: Task posting, lifecycle transitions and settlement

pub mod task;
