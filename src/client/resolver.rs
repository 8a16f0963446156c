//! Agent card resolution
//!
//! Fetches agent cards from the A2A well-known endpoint
//! (`{base_url}/.well-known/agent.json`). Used at startup for each configured
//! remote address and by the background liveness refresher.

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::protocol::messages::AgentCard;
use std::time::Duration;
use tracing::{debug, warn};

/// Well-known path every A2A agent serves its card at
pub const AGENT_CARD_PATH: &str = "/.well-known/agent.json";

/// Resolves agent cards over HTTP
#[derive(Debug, Clone)]
pub struct CardResolver {
    client: reqwest::Client,
}

impl CardResolver {
    /// Create a resolver with the given per-request timeout
    pub fn new(timeout: Duration) -> OrchestratorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(OrchestratorError::Http)?;
        Ok(Self { client })
    }

    /// Fetch the agent card from a remote agent's base URL
    pub async fn resolve(&self, base_url: &str) -> OrchestratorResult<AgentCard> {
        let card_url = format!(
            "{}{}",
            base_url.trim_end_matches('/'),
            AGENT_CARD_PATH
        );
        debug!("Resolving agent card from {}", card_url);

        let response = self.client.get(&card_url).send().await.map_err(|e| {
            OrchestratorError::CardResolution {
                url: base_url.to_string(),
                message: e.to_string(),
            }
        })?;

        if !response.status().is_success() {
            return Err(OrchestratorError::CardResolution {
                url: base_url.to_string(),
                message: format!("unexpected status {}", response.status()),
            });
        }

        let card: AgentCard =
            response
                .json()
                .await
                .map_err(|e| OrchestratorError::CardResolution {
                    url: base_url.to_string(),
                    message: format!("invalid card payload: {e}"),
                })?;

        if card.name.trim().is_empty() {
            return Err(OrchestratorError::CardResolution {
                url: base_url.to_string(),
                message: "card has empty agent name".to_string(),
            });
        }

        debug!("Resolved card for agent '{}' at {}", card.name, base_url);
        Ok(card)
    }

    /// Resolve cards for a list of addresses, skipping unreachable agents
    ///
    /// Returns the cards that resolved. Unreachable agents are logged and
    /// skipped rather than failing startup, matching the intended behavior of
    /// connecting to independently-owned agents that may be down.
    pub async fn resolve_all(&self, addresses: &[String]) -> Vec<AgentCard> {
        let mut cards = Vec::new();
        for address in addresses {
            match self.resolve(address).await {
                Ok(card) => {
                    debug!(
                        "Successfully connected to remote agent: {} at {}",
                        card.name, address
                    );
                    cards.push(card);
                }
                Err(e) => {
                    warn!("Could not connect to remote agent at {}: {}", address, e);
                }
            }
        }
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_url_construction() {
        // Trailing slashes must not produce double slashes in the path
        let base = "http://localhost:10002/";
        let url = format!("{}{}", base.trim_end_matches('/'), AGENT_CARD_PATH);
        assert_eq!(url, "http://localhost:10002/.well-known/agent.json");

        let base = "http://localhost:10002";
        let url = format!("{}{}", base.trim_end_matches('/'), AGENT_CARD_PATH);
        assert_eq!(url, "http://localhost:10002/.well-known/agent.json");
    }

    #[tokio::test]
    async fn test_resolve_unreachable_agent_fails() {
        let resolver = CardResolver::new(Duration::from_millis(200)).unwrap();

        // Port 1 should refuse connections
        let result = resolver.resolve("http://127.0.0.1:1").await;
        assert!(matches!(
            result,
            Err(OrchestratorError::CardResolution { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_all_skips_unreachable() {
        let resolver = CardResolver::new(Duration::from_millis(200)).unwrap();

        let cards = resolver
            .resolve_all(&["http://127.0.0.1:1".to_string()])
            .await;
        assert!(cards.is_empty());
    }
}
