//! Task orchestration core
//!
//! The orchestrator owns the agent registry, routes incoming tasks to remote
//! agents, aggregates their replies, and tracks task state for `tasks/get`
//! and `tasks/cancel`.

pub mod factory;
pub mod manager;
pub mod task_store;

pub use factory::{ConnectionFactory, HttpConnectionFactory};
pub use manager::Orchestrator;
pub use task_store::TaskStore;
