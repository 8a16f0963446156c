//! End-to-end RPC server tests
//!
//! Drives the warp route tree with JSON-RPC requests, with wiremock standing
//! in for the remote agent's A2A endpoint, so the full path (HTTP decode,
//! method dispatch, routing, remote call, aggregation) is exercised.


use a2a_orchestrator::orchestrator::{HttpConnectionFactory, Orchestrator};
use a2a_orchestrator::server::A2aServer;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use test_helpers::test_config;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn server() -> A2aServer {
    let factory = Arc::new(HttpConnectionFactory::new(Duration::from_secs(2)));
    let orchestrator = Arc::new(Orchestrator::new(test_config(), factory).unwrap());
    A2aServer::new(orchestrator)
}

async fn rpc(server: &A2aServer, body: Value) -> Value {
    let response = warp::test::request()
        .method("POST")
        .path("/")
        .body(body.to_string())
        .reply(&server.routes())
        .await;
    assert_eq!(response.status(), 200);
    serde_json::from_slice(response.body()).unwrap()
}

/// Mock remote agent: serves its card and completes every tasks/send
async fn mock_agent(name: &str, artifact_text: &str) -> MockServer {
    let server = MockServer::start().await;

    let card = json!({
        "name": name,
        "description": format!("{name} agent"),
        "url": server.uri(),
        "version": "1.0.0",
        "skills": [{"id": "planning", "name": "Planning", "tags": ["planning"]}]
    });
    Mock::given(method("GET"))
        .and(path("/.well-known/agent.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(card))
        .mount(&server)
        .await;

    let task_response = json!({
        "jsonrpc": "2.0",
        "id": "remote-1",
        "result": {
            "id": "task-e2e",
            "sessionId": "session-e2e",
            "status": {"state": "completed", "timestamp": "2026-08-30T12:00:00Z"},
            "artifacts": [{
                "name": format!("{name}-output"),
                "parts": [{"type": "text", "text": artifact_text}]
            }]
        }
    });
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_response))
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_full_task_flow_over_http() {
    let remote = mock_agent("Planner Agent", "the plan").await;
    let server = server();

    // Register the remote agent through the RPC surface
    let card = json!({
        "name": "Planner Agent",
        "description": "plans events",
        "url": remote.uri(),
        "version": "1.0.0",
        "skills": [{"id": "planning", "name": "Planning", "tags": ["planning"]}]
    });
    let response = rpc(
        &server,
        json!({"jsonrpc": "2.0", "id": 1, "method": "agents/register", "params": card}),
    )
    .await;
    assert!(response["error"].is_null());

    // Send a task; it should be dispatched to the wiremock agent
    let response = rpc(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tasks/send",
            "params": {
                "id": "task-e2e",
                "message": {
                    "role": "user",
                    "parts": [{"type": "text", "text": "plan a night out"}]
                },
                "metadata": {"skill": "planning"}
            }
        }),
    )
    .await;

    assert!(response["error"].is_null(), "error: {}", response["error"]);
    assert_eq!(response["result"]["id"], "task-e2e");
    assert_eq!(response["result"]["status"]["state"], "completed");
    assert_eq!(
        response["result"]["artifacts"][0]["parts"][0]["text"],
        "the plan"
    );

    // The stored snapshot is queryable afterwards
    let response = rpc(
        &server,
        json!({"jsonrpc": "2.0", "id": 3, "method": "tasks/get", "params": {"id": "task-e2e"}}),
    )
    .await;
    assert_eq!(response["result"]["status"]["state"], "completed");
}

#[tokio::test]
async fn test_send_to_unreachable_agent_fails_task() {
    let server = server();

    // Register an agent whose endpoint refuses connections
    let card = json!({
        "name": "Ghost Agent",
        "description": "not actually running",
        "url": "http://127.0.0.1:1",
        "version": "1.0.0",
        "skills": [{"id": "planning", "name": "Planning", "tags": ["planning"]}]
    });
    rpc(
        &server,
        json!({"jsonrpc": "2.0", "id": 1, "method": "agents/register", "params": card}),
    )
    .await;

    let response = rpc(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tasks/send",
            "params": {
                "id": "task-ghost",
                "message": {
                    "role": "user",
                    "parts": [{"type": "text", "text": "anyone there?"}]
                }
            }
        }),
    )
    .await;

    // The dispatch failed, so the aggregate task is failed but still returned
    assert!(response["error"].is_null());
    assert_eq!(response["result"]["status"]["state"], "failed");
}

#[tokio::test]
async fn test_rpc_error_codes_over_http() {
    let server = server();
    let routes = server.routes();

    // Parse error
    let response = warp::test::request()
        .method("POST")
        .path("/")
        .body("{broken")
        .reply(&routes)
        .await;
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["error"]["code"], -32700);

    // Method not found
    let response = rpc(
        &server,
        json!({"jsonrpc": "2.0", "id": 1, "method": "tasks/stream"}),
    )
    .await;
    assert_eq!(response["error"]["code"], -32601);

    // Task not found
    let response = rpc(
        &server,
        json!({"jsonrpc": "2.0", "id": 2, "method": "tasks/get", "params": {"id": "nope"}}),
    )
    .await;
    assert_eq!(response["error"]["code"], -32001);

    // No agent available
    let response = rpc(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tasks/send",
            "params": {
                "id": "task-1",
                "message": {"role": "user", "parts": [{"type": "text", "text": "hi"}]}
            }
        }),
    )
    .await;
    assert_eq!(response["error"]["code"], -32004);
}

#[tokio::test]
async fn test_agents_list_reflects_registrations() {
    let server = server();

    let response = rpc(
        &server,
        json!({"jsonrpc": "2.0", "id": 1, "method": "agents/list"}),
    )
    .await;
    assert_eq!(response["result"].as_array().unwrap().len(), 0);

    let card = json!({
        "name": "Social Agent",
        "description": "posts things",
        "url": "http://localhost:10002",
        "version": "1.0.0"
    });
    rpc(
        &server,
        json!({"jsonrpc": "2.0", "id": 2, "method": "agents/register", "params": card}),
    )
    .await;

    let response = rpc(
        &server,
        json!({"jsonrpc": "2.0", "id": 3, "method": "agents/list"}),
    )
    .await;
    let agents = response["result"].as_array().unwrap();
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0]["name"], "Social Agent");
}
