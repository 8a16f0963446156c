//! Connection factory seam
//!
//! The orchestrator builds a connection per dispatch target from the entry's
//! card. The trait exists so tests can swap the HTTP client for mocks without
//! touching the dispatch path.

use crate::client::{AgentConnection, RemoteAgentClient};
use crate::error::OrchestratorResult;
use crate::protocol::messages::AgentCard;
use std::sync::Arc;
use std::time::Duration;

/// Builds agent connections from resolved cards
pub trait ConnectionFactory: Send + Sync {
    /// Create a connection for the agent described by `card`
    fn connect(&self, card: &AgentCard) -> OrchestratorResult<Arc<dyn AgentConnection>>;
}

/// Factory producing JSON-RPC-over-HTTP connections
#[derive(Debug, Clone)]
pub struct HttpConnectionFactory {
    dispatch_timeout: Duration,
}

impl HttpConnectionFactory {
    /// Create a factory whose connections use the given per-call timeout
    pub fn new(dispatch_timeout: Duration) -> Self {
        Self { dispatch_timeout }
    }
}

impl ConnectionFactory for HttpConnectionFactory {
    fn connect(&self, card: &AgentCard) -> OrchestratorResult<Arc<dyn AgentConnection>> {
        let client = RemoteAgentClient::new(card.clone(), self.dispatch_timeout)?;
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::AgentCapabilities;

    #[test]
    fn test_http_factory_builds_named_connection() {
        let factory = HttpConnectionFactory::new(Duration::from_secs(5));
        let card = AgentCard {
            name: "planner".to_string(),
            description: "plans things".to_string(),
            url: "http://localhost:10002".to_string(),
            version: "1.0.0".to_string(),
            default_input_modes: vec![],
            default_output_modes: vec![],
            capabilities: AgentCapabilities::default(),
            skills: vec![],
        };

        let connection = factory.connect(&card).unwrap();
        assert_eq!(connection.agent_name(), "planner");
    }
}
