//! Response aggregation
//!
//! Dispatches a task to every agent in a dispatch plan concurrently, waits
//! until each target has replied or timed out, and reconciles the per-agent
//! outcomes into a single orchestrator task. The aggregate is never emitted
//! while any dispatched agent is still pending.

use crate::client::AgentConnection;
use crate::protocol::messages::{
    Artifact, Message, Task, TaskSendParams, TaskState, TaskStatus,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// How a single dispatched agent concluded
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeKind {
    Completed,
    InputRequired,
    Failed,
    Canceled,
    TimedOut,
}

impl OutcomeKind {
    fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Completed => "completed",
            OutcomeKind::InputRequired => "input-required",
            OutcomeKind::Failed => "failed",
            OutcomeKind::Canceled => "canceled",
            OutcomeKind::TimedOut => "timed-out",
        }
    }
}

/// Outcome of one agent's dispatch
#[derive(Debug, Clone)]
pub struct AgentOutcome {
    /// Agent name
    pub agent: String,
    pub kind: OutcomeKind,
    /// The remote task snapshot, when one came back
    pub task: Option<Task>,
    /// Failure detail, when the dispatch did not complete
    pub detail: Option<String>,
}

impl AgentOutcome {
    fn succeeded(&self) -> bool {
        self.kind == OutcomeKind::Completed
    }
}

/// Aggregated result of a fan-out dispatch
#[derive(Debug, Clone)]
pub struct AggregateResult {
    /// The reconciled orchestrator task
    pub task: Task,
    /// Per-agent outcomes, in dispatch order
    pub outcomes: Vec<AgentOutcome>,
}

/// Collects replies from dispatched agents into one response
#[derive(Debug, Clone)]
pub struct ResponseAggregator {
    dispatch_timeout: Duration,
}

impl ResponseAggregator {
    /// Create an aggregator with the given per-agent dispatch timeout
    pub fn new(dispatch_timeout: Duration) -> Self {
        Self { dispatch_timeout }
    }

    /// Dispatch to all targets and reconcile once every target has concluded
    ///
    /// The returned task carries the caller's task id and session id. Its
    /// state reflects the reconciliation rules:
    /// - every target completed: `completed` with merged artifacts
    /// - a single target asking for input: `input-required`
    /// - partial success: `completed`, with per-agent annotations
    /// - no successes: `failed`
    pub async fn dispatch_and_collect(
        &self,
        params: &TaskSendParams,
        connections: Vec<Arc<dyn AgentConnection>>,
    ) -> AggregateResult {
        let dispatches = connections.iter().map(|connection| {
            let connection = connection.clone();
            let params = params.clone();
            let deadline = self.dispatch_timeout;
            async move {
                let agent = connection.agent_name().to_string();
                debug!(agent = %agent, task_id = %params.id, "Dispatching task");

                match timeout(deadline, connection.send_task(&params)).await {
                    Ok(Ok(task)) => outcome_from_task(agent, task),
                    Ok(Err(e)) => {
                        warn!(agent = %agent, error = %e, "Dispatch failed");
                        AgentOutcome {
                            agent,
                            kind: OutcomeKind::Failed,
                            task: None,
                            detail: Some(e.to_string()),
                        }
                    }
                    Err(_) => {
                        warn!(
                            agent = %agent,
                            timeout_secs = deadline.as_secs(),
                            "Dispatch timed out"
                        );
                        AgentOutcome {
                            agent,
                            kind: OutcomeKind::TimedOut,
                            task: None,
                            detail: Some(format!(
                                "no reply within {}s",
                                deadline.as_secs()
                            )),
                        }
                    }
                }
            }
        });

        // join_all resolves only after every dispatch concluded or timed out
        let outcomes: Vec<AgentOutcome> = futures::future::join_all(dispatches).await;

        let task = self.reconcile(params, &outcomes);
        info!(
            task_id = %task.id,
            state = ?task.status.state,
            outcomes = ?outcomes
                .iter()
                .map(|o| format!("{}:{}", o.agent, o.kind.as_str()))
                .collect::<Vec<_>>(),
            "Aggregation complete"
        );

        AggregateResult { task, outcomes }
    }

    fn reconcile(&self, params: &TaskSendParams, outcomes: &[AgentOutcome]) -> Task {
        let successes: Vec<&AgentOutcome> = outcomes.iter().filter(|o| o.succeeded()).collect();

        // A lone agent asking for more input surfaces directly to the caller
        if outcomes.len() == 1 && outcomes[0].kind == OutcomeKind::InputRequired {
            let remote = outcomes[0].task.as_ref();
            let status_message = remote.and_then(|t| t.status.message.clone());
            let mut status = TaskStatus::now(TaskState::InputRequired);
            status.message = status_message;
            return self.build_task(params, status, None, outcomes);
        }

        if successes.is_empty() {
            let summary = outcomes
                .iter()
                .map(|o| {
                    format!(
                        "{}: {}",
                        o.agent,
                        o.detail.as_deref().unwrap_or(o.kind.as_str())
                    )
                })
                .collect::<Vec<_>>()
                .join("; ");
            let status = TaskStatus::now(TaskState::Failed)
                .with_message(Message::agent_text(format!("All dispatches failed: {summary}")));
            return self.build_task(params, status, None, outcomes);
        }

        // Merge artifacts from all successful agents, tagging their origin
        let mut artifacts: Vec<Artifact> = Vec::new();
        for outcome in &successes {
            if let Some(task) = &outcome.task {
                if let Some(remote_artifacts) = &task.artifacts {
                    for artifact in remote_artifacts {
                        let mut tagged = artifact.clone();
                        let metadata = tagged.metadata.get_or_insert_with(HashMap::new);
                        metadata.insert("agent".to_string(), json!(outcome.agent));
                        artifacts.push(tagged);
                    }
                }
            }
        }

        let status_message = if successes.len() == 1 && outcomes.len() == 1 {
            // Single dispatch: pass the agent's own status message through
            successes[0]
                .task
                .as_ref()
                .and_then(|t| t.status.message.clone())
        } else {
            let text = outcomes
                .iter()
                .map(|o| format!("{}: {}", o.agent, o.kind.as_str()))
                .collect::<Vec<_>>()
                .join("; ");
            Some(Message::agent_text(format!(
                "{}/{} agents completed ({text})",
                successes.len(),
                outcomes.len()
            )))
        };

        let mut status = TaskStatus::now(TaskState::Completed);
        status.message = status_message;

        let artifacts = if artifacts.is_empty() {
            None
        } else {
            Some(artifacts)
        };

        self.build_task(params, status, artifacts, outcomes)
    }

    fn build_task(
        &self,
        params: &TaskSendParams,
        status: TaskStatus,
        artifacts: Option<Vec<Artifact>>,
        outcomes: &[AgentOutcome],
    ) -> Task {
        let mut metadata = params.metadata.clone().unwrap_or_default();
        metadata.insert(
            "dispatch_outcomes".to_string(),
            json!(outcomes
                .iter()
                .map(|o| {
                    json!({
                        "agent": o.agent,
                        "outcome": o.kind.as_str(),
                        "detail": o.detail,
                    })
                })
                .collect::<Vec<_>>()),
        );

        Task {
            id: params.id.clone(),
            session_id: params.session_id.clone(),
            status,
            artifacts,
            metadata: Some(metadata),
        }
    }
}

fn outcome_from_task(agent: String, task: Task) -> AgentOutcome {
    let kind = match task.status.state {
        TaskState::Completed => OutcomeKind::Completed,
        TaskState::InputRequired => OutcomeKind::InputRequired,
        TaskState::Canceled => OutcomeKind::Canceled,
        TaskState::Failed => OutcomeKind::Failed,
        // Submitted/working after a completed send call means the remote
        // never reached a settled state; treat as failure for aggregation
        TaskState::Submitted | TaskState::Working | TaskState::Unknown => OutcomeKind::Failed,
    };

    let detail = match kind {
        OutcomeKind::Completed | OutcomeKind::InputRequired => None,
        _ => task
            .status
            .message
            .as_ref()
            .map(|m| m.text_content())
            .filter(|s| !s.is_empty())
            .or_else(|| Some(format!("remote state {:?}", task.status.state))),
    };

    AgentOutcome {
        agent,
        kind,
        task: Some(task),
        detail,
    }
}
