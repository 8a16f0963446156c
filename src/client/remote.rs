//! JSON-RPC client for remote agents
//!
//! Wraps a resolved agent card with an HTTP client that speaks the A2A
//! JSON-RPC surface (`tasks/send`, `tasks/get`, `tasks/cancel`).

use crate::client::AgentConnection;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::protocol::messages::{AgentCard, Task, TaskQueryParams, TaskSendParams};
use crate::protocol::rpc::{methods, JsonRpcRequest, JsonRpcResponse};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// HTTP JSON-RPC connection to a single remote agent
#[derive(Debug, Clone)]
pub struct RemoteAgentClient {
    card: AgentCard,
    client: reqwest::Client,
}

impl RemoteAgentClient {
    /// Create a client for the given card with a per-call timeout
    pub fn new(card: AgentCard, timeout: Duration) -> OrchestratorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(OrchestratorError::Http)?;
        Ok(Self { card, client })
    }

    /// The card this connection was built from
    pub fn card(&self) -> &AgentCard {
        &self.card
    }

    async fn call<P: serde::Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
    ) -> OrchestratorResult<R> {
        let params_value = serde_json::to_value(params)
            .map_err(|e| OrchestratorError::internal(format!("param encoding failed: {e}")))?;
        let request =
            JsonRpcRequest::new(Uuid::new_v4().to_string(), method, params_value);

        debug!(
            agent = %self.card.name,
            method = %method,
            "Calling remote agent"
        );

        let response = self
            .client
            .post(&self.card.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| OrchestratorError::dispatch(&self.card.name, e.to_string()))?;

        if !response.status().is_success() {
            return Err(OrchestratorError::dispatch(
                &self.card.name,
                format!("unexpected status {}", response.status()),
            ));
        }

        let rpc: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| OrchestratorError::dispatch(&self.card.name, e.to_string()))?;

        if let Some(error) = rpc.error {
            return Err(OrchestratorError::dispatch(
                &self.card.name,
                format!("remote error {}: {}", error.code, error.message),
            ));
        }

        let result: Value = rpc.result.ok_or_else(|| {
            OrchestratorError::dispatch(&self.card.name, "response missing result")
        })?;

        serde_json::from_value(result).map_err(|e| {
            OrchestratorError::dispatch(&self.card.name, format!("invalid result payload: {e}"))
        })
    }
}

#[async_trait::async_trait]
impl AgentConnection for RemoteAgentClient {
    fn agent_name(&self) -> &str {
        &self.card.name
    }

    async fn send_task(&self, params: &TaskSendParams) -> Result<Task, OrchestratorError> {
        self.call(methods::TASKS_SEND, params).await
    }

    async fn get_task(&self, task_id: &str) -> Result<Task, OrchestratorError> {
        let params = TaskQueryParams {
            id: task_id.to_string(),
        };
        self.call(methods::TASKS_GET, &params).await
    }

    async fn cancel_task(&self, task_id: &str) -> Result<Task, OrchestratorError> {
        let params = TaskQueryParams {
            id: task_id.to_string(),
        };
        self.call(methods::TASKS_CANCEL, &params).await
    }
}
