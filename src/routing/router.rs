//! Router trait and dispatch plan types
//!
//! Separates target selection from task execution: the router picks agents,
//! the aggregator delivers to them. Keeping selection synchronous and
//! registry-only makes routing decisions cheap and deterministic.

use crate::error::OrchestratorError;
use crate::protocol::messages::TaskSendParams;
use crate::registry::{AgentEntry, AgentRegistry};

/// Routing hints extracted from an incoming task
///
/// `target_agent` and `skill` come from the task metadata keys `agent` and
/// `skill`. An explicit agent pin always wins over skill matching.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
    /// Task identifier (for logging)
    pub task_id: String,
    /// Requested skill tag, if any
    pub skill: Option<String>,
    /// Explicitly pinned agent name, if any
    pub target_agent: Option<String>,
}

impl DispatchRequest {
    /// Extract routing hints from task send parameters
    pub fn from_params(params: &TaskSendParams) -> Self {
        let get_meta = |key: &str| {
            params
                .metadata
                .as_ref()
                .and_then(|m| m.get(key))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };

        Self {
            task_id: params.id.clone(),
            skill: get_meta("skill"),
            target_agent: get_meta("agent"),
        }
    }
}

/// The set of agents selected to receive a task
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchPlan {
    /// Agents the task will be delivered to, in dispatch order
    pub targets: Vec<AgentEntry>,
    /// Human-readable selection rationale (for logging and task metadata)
    pub reason: String,
}

impl DispatchPlan {
    /// Names of the planned targets
    pub fn target_names(&self) -> Vec<String> {
        self.targets.iter().map(|e| e.card.name.clone()).collect()
    }

    /// Whether this plan fans out to more than one agent
    pub fn is_fan_out(&self) -> bool {
        self.targets.len() > 1
    }
}

/// Router trait for selecting dispatch targets
///
/// Implementations must return a non-empty plan or an error; an empty target
/// list is never valid.
pub trait Router: Send + Sync {
    /// Select the agents that should receive this task
    fn plan(
        &self,
        request: &DispatchRequest,
        registry: &AgentRegistry,
    ) -> Result<DispatchPlan, OrchestratorError>;
}
