//! Mock implementations for testing
//!
//! Provides a mock `AgentConnection` with configurable behavior (complete,
//! fail, hang, ask for input, cancel) that records every task it receives.

use crate::client::AgentConnection;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::orchestrator::ConnectionFactory;
use crate::protocol::messages::{
    AgentCard, Artifact, Message, Part, Task, TaskSendParams, TaskState, TaskStatus,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Scripted behavior for a mock connection
#[derive(Debug, Clone)]
enum MockBehavior {
    /// Complete with a single text artifact
    Complete { artifact_text: String },
    /// Return a dispatch error
    Fail { message: String },
    /// Sleep before completing (for timeout tests)
    Hang { delay: Duration },
    /// Ask the caller for more input
    InputRequired { prompt: String },
    /// Report the remote task as canceled
    Canceled,
}

/// Mock agent connection that records received tasks
#[derive(Debug)]
pub struct MockConnection {
    name: String,
    behavior: MockBehavior,
    pub received_tasks: Arc<Mutex<Vec<TaskSendParams>>>,
}

impl MockConnection {
    fn new(name: &str, behavior: MockBehavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            received_tasks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Connection that completes with a single text artifact
    pub fn completing(name: &str, artifact_text: &str) -> Self {
        Self::new(
            name,
            MockBehavior::Complete {
                artifact_text: artifact_text.to_string(),
            },
        )
    }

    /// Connection whose sends always fail
    pub fn failing(name: &str, message: &str) -> Self {
        Self::new(
            name,
            MockBehavior::Fail {
                message: message.to_string(),
            },
        )
    }

    /// Connection that sleeps before completing
    pub fn hanging(name: &str, delay: Duration) -> Self {
        Self::new(name, MockBehavior::Hang { delay })
    }

    /// Connection that asks for more input
    pub fn input_required(name: &str, prompt: &str) -> Self {
        Self::new(
            name,
            MockBehavior::InputRequired {
                prompt: prompt.to_string(),
            },
        )
    }

    /// Connection that reports its task canceled
    pub fn canceling(name: &str) -> Self {
        Self::new(name, MockBehavior::Canceled)
    }

    /// Tasks this connection has received so far
    pub async fn get_received_tasks(&self) -> Vec<TaskSendParams> {
        self.received_tasks.lock().await.clone()
    }

    fn completed_task(&self, params: &TaskSendParams, artifact_text: &str) -> Task {
        Task {
            id: params.id.clone(),
            session_id: params.session_id.clone(),
            status: TaskStatus::now(TaskState::Completed)
                .with_message(Message::agent_text(format!("{} done", self.name))),
            artifacts: Some(vec![Artifact {
                name: Some(format!("{}-output", self.name)),
                parts: vec![Part::text(artifact_text)],
                metadata: None,
            }]),
            metadata: None,
        }
    }
}

#[async_trait::async_trait]
impl AgentConnection for MockConnection {
    fn agent_name(&self) -> &str {
        &self.name
    }

    async fn send_task(&self, params: &TaskSendParams) -> Result<Task, OrchestratorError> {
        self.received_tasks.lock().await.push(params.clone());

        match &self.behavior {
            MockBehavior::Complete { artifact_text } => {
                Ok(self.completed_task(params, artifact_text))
            }
            MockBehavior::Fail { message } => {
                Err(OrchestratorError::dispatch(&self.name, message.clone()))
            }
            MockBehavior::Hang { delay } => {
                tokio::time::sleep(*delay).await;
                Ok(self.completed_task(params, "late output"))
            }
            MockBehavior::InputRequired { prompt } => Ok(Task {
                id: params.id.clone(),
                session_id: params.session_id.clone(),
                status: TaskStatus::now(TaskState::InputRequired)
                    .with_message(Message::agent_text(prompt.clone())),
                artifacts: None,
                metadata: None,
            }),
            MockBehavior::Canceled => Ok(Task {
                id: params.id.clone(),
                session_id: params.session_id.clone(),
                status: TaskStatus::now(TaskState::Canceled)
                    .with_message(Message::agent_text("canceled upstream")),
                artifacts: None,
                metadata: None,
            }),
        }
    }

    async fn get_task(&self, task_id: &str) -> Result<Task, OrchestratorError> {
        let received = self.received_tasks.lock().await;
        received
            .iter()
            .rev()
            .find(|p| p.id == task_id)
            .map(|p| self.completed_task(p, "stored output"))
            .ok_or_else(|| OrchestratorError::task_not_found(task_id))
    }

    async fn cancel_task(&self, task_id: &str) -> Result<Task, OrchestratorError> {
        let received = self.received_tasks.lock().await;
        received
            .iter()
            .rev()
            .find(|p| p.id == task_id)
            .map(|p| Task {
                id: p.id.clone(),
                session_id: p.session_id.clone(),
                status: TaskStatus::now(TaskState::Canceled),
                artifacts: None,
                metadata: None,
            })
            .ok_or_else(|| OrchestratorError::task_not_found(task_id))
    }
}

/// Connection factory backed by pre-registered mock connections
///
/// Tests insert a mock per agent name; `connect` hands out the mock matching
/// the card. Keeping the returned `Arc<MockConnection>` lets tests assert on
/// the tasks the agent received.
#[derive(Debug, Default)]
pub struct MockConnectionFactory {
    connections: std::sync::Mutex<HashMap<String, Arc<MockConnection>>>,
}

impl MockConnectionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mock connection, returning a handle for assertions
    pub fn insert(&self, connection: MockConnection) -> Arc<MockConnection> {
        let connection = Arc::new(connection);
        self.connections
            .lock()
            .unwrap()
            .insert(connection.agent_name().to_string(), connection.clone());
        connection
    }
}

impl ConnectionFactory for MockConnectionFactory {
    fn connect(&self, card: &AgentCard) -> OrchestratorResult<Arc<dyn AgentConnection>> {
        self.connections
            .lock()
            .unwrap()
            .get(&card.name)
            .cloned()
            .map(|c| c as Arc<dyn AgentConnection>)
            .ok_or_else(|| {
                OrchestratorError::internal(format!("no mock connection for '{}'", card.name))
            })
    }
}
