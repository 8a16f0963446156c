//! A2A Task Injection Utility
//!
//! A simple tool for sending tasks to a running orchestration server.
//! Useful for experimentation and for exercising routing behavior by hand.
//!
//! ## Usage
//!
//! ```bash
//! # Simple task, routed by the orchestrator
//! send-task --message "Plan a night out in Amsterdam"
//!
//! # Route by skill
//! send-task --message "Summarize this profile" --skill analysis
//!
//! # Pin a specific agent
//! send-task --message "Draft a post" --agent "Social Agent"
//!
//! # Follow up within a session
//! send-task --message "Make it Friday instead" --session-id my-session-1
//!
//! # Query or cancel an earlier task
//! send-task --get task-42
//! send-task --cancel task-42
//! ```

use clap::Parser;
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "send-task",
    about = "Send tasks to a running A2A orchestration server",
    long_about = "A simple tool for sending tasks to a running orchestration server.\nUseful for experimentation and exercising routing behavior by hand."
)]
struct Args {
    /// Message text to send as a task
    #[arg(long, conflicts_with_all = ["get", "cancel"])]
    message: Option<String>,

    /// Task ID (auto-generated if not provided)
    #[arg(long)]
    task_id: Option<String>,

    /// Session ID for conversation continuity
    #[arg(long)]
    session_id: Option<String>,

    /// Requested skill tag for routing
    #[arg(long)]
    skill: Option<String>,

    /// Pin dispatch to a specific agent by name
    #[arg(long)]
    agent: Option<String>,

    /// Fetch the state of an existing task by ID
    #[arg(long)]
    get: Option<String>,

    /// Cancel an existing task by ID
    #[arg(long, conflicts_with = "get")]
    cancel: Option<String>,

    /// Orchestrator endpoint URL
    #[arg(long, default_value = "http://localhost:10000")]
    url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let (method, params) = if let Some(task_id) = &args.get {
        ("tasks/get", json!({ "id": task_id }))
    } else if let Some(task_id) = &args.cancel {
        ("tasks/cancel", json!({ "id": task_id }))
    } else if let Some(message) = &args.message {
        let task_id = args
            .task_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut metadata = serde_json::Map::new();
        if let Some(skill) = &args.skill {
            metadata.insert("skill".to_string(), json!(skill));
        }
        if let Some(agent) = &args.agent {
            metadata.insert("agent".to_string(), json!(agent));
        }

        let mut params = json!({
            "id": task_id,
            "message": {
                "role": "user",
                "parts": [{"type": "text", "text": message}]
            },
            "acceptedOutputModes": ["text", "text/plain"]
        });
        if let Some(session_id) = &args.session_id {
            params["sessionId"] = json!(session_id);
        }
        if !metadata.is_empty() {
            params["metadata"] = Value::Object(metadata);
        }

        eprintln!("Sending task {task_id} to {}", args.url);
        ("tasks/send", params)
    } else {
        return Err("one of --message, --get, or --cancel is required".into());
    };

    let request = json!({
        "jsonrpc": "2.0",
        "id": Uuid::new_v4().to_string(),
        "method": method,
        "params": params
    });

    let client = reqwest::Client::new();
    let response: Value = client
        .post(&args.url)
        .json(&request)
        .send()
        .await?
        .json()
        .await?;

    if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
        eprintln!("RPC error: {}", serde_json::to_string_pretty(error)?);
        std::process::exit(1);
    }

    println!(
        "{}",
        serde_json::to_string_pretty(response.get("result").unwrap_or(&Value::Null))?
    );
    Ok(())
}
