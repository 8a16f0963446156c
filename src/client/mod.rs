//! Remote agent client layer
//!
//! This module provides the HTTP client abstraction used to reach remote
//! client agents: card resolution from the well-known endpoint and JSON-RPC
//! task calls against an agent's A2A endpoint.

use crate::error::OrchestratorError;
use crate::protocol::messages::{Task, TaskSendParams};

pub mod remote;
pub mod resolver;

pub use remote::RemoteAgentClient;
pub use resolver::CardResolver;

/// Connection to a single remote agent
///
/// Abstraction over the A2A task calls so the dispatcher and aggregator can
/// be tested with mock connections.
#[async_trait::async_trait]
pub trait AgentConnection: Send + Sync {
    /// The agent's registered name
    fn agent_name(&self) -> &str;

    /// Send a task to this agent and wait for its task snapshot
    async fn send_task(&self, params: &TaskSendParams) -> Result<Task, OrchestratorError>;

    /// Fetch the current state of a previously sent task
    async fn get_task(&self, task_id: &str) -> Result<Task, OrchestratorError>;

    /// Request cancellation of a previously sent task
    async fn cancel_task(&self, task_id: &str) -> Result<Task, OrchestratorError>;
}
