//! Agent card resolution tests against a mock HTTP agent
//!
//! Uses wiremock to stand in for remote agents serving their card at the
//! well-known path.


use a2a_orchestrator::client::CardResolver;
use a2a_orchestrator::error::OrchestratorError;
use a2a_orchestrator::orchestrator::{HttpConnectionFactory, Orchestrator};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use test_helpers::test_config;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn card_body(name: &str, url: &str) -> serde_json::Value {
    json!({
        "name": name,
        "description": format!("{name} agent"),
        "url": url,
        "version": "1.0.0",
        "defaultInputModes": ["text/plain"],
        "defaultOutputModes": ["text/plain"],
        "capabilities": {"streaming": false, "pushNotifications": false},
        "skills": [{
            "id": "planning",
            "name": "Event Planning",
            "tags": ["planning"]
        }]
    })
}

async fn mock_agent(name: &str) -> MockServer {
    let server = MockServer::start().await;
    let body = card_body(name, &server.uri());
    Mock::given(method("GET"))
        .and(path("/.well-known/agent.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_resolve_card_from_well_known_path() {
    let server = mock_agent("Planner Agent").await;
    let resolver = CardResolver::new(Duration::from_secs(2)).unwrap();

    let card = resolver.resolve(&server.uri()).await.unwrap();

    assert_eq!(card.name, "Planner Agent");
    assert_eq!(card.url, server.uri());
    assert!(card.has_skill("planning"));
}

#[tokio::test]
async fn test_resolve_rejects_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/agent.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let resolver = CardResolver::new(Duration::from_secs(2)).unwrap();
    let result = resolver.resolve(&server.uri()).await;

    assert!(matches!(
        result,
        Err(OrchestratorError::CardResolution { .. })
    ));
}

#[tokio::test]
async fn test_resolve_rejects_malformed_card() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/agent.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let resolver = CardResolver::new(Duration::from_secs(2)).unwrap();
    let result = resolver.resolve(&server.uri()).await;

    assert!(matches!(
        result,
        Err(OrchestratorError::CardResolution { .. })
    ));
}

#[tokio::test]
async fn test_resolve_all_keeps_reachable_agents() {
    let reachable = mock_agent("Planner Agent").await;
    let resolver = CardResolver::new(Duration::from_millis(500)).unwrap();

    let cards = resolver
        .resolve_all(&[
            reachable.uri(),
            // Port 1 refuses connections
            "http://127.0.0.1:1".to_string(),
        ])
        .await;

    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].name, "Planner Agent");
}

#[tokio::test]
async fn test_bootstrap_registers_configured_agents() {
    let planner = mock_agent("Planner Agent").await;
    let social = mock_agent("Social Agent").await;

    let mut config = test_config();
    config.agents.addresses = vec![
        planner.uri(),
        social.uri(),
        "http://127.0.0.1:1".to_string(),
    ];
    config.agents.card_timeout_secs = 1;

    let factory = Arc::new(HttpConnectionFactory::new(Duration::from_secs(2)));
    let orchestrator = Orchestrator::new(config, factory).unwrap();

    // Startup tolerates the unreachable address and registers the rest
    orchestrator.bootstrap().await;

    let agents = orchestrator.list_agents();
    assert_eq!(agents.len(), 2);
    assert_eq!(agents[0].name, "Planner Agent");
    assert_eq!(agents[1].name, "Social Agent");
}
