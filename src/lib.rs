//! A2A Orchestration Server
//!
//! An orchestration server for the A2A (Agent-to-Agent) protocol. It
//! maintains a registry of remote client agents, routes incoming tasks to the
//! agents whose advertised skills match, and aggregates their replies into a
//! single response.
//!
//! # Overview
//!
//! This crate provides:
//! - A2A protocol types (agent cards, tasks, multi-part messages) and the
//!   JSON-RPC 2.0 envelope
//! - A TTL-based agent descriptor registry with liveness tracking
//! - Skill-based dispatch routing with single and broadcast modes
//! - Response aggregation that settles only after every dispatched agent
//!   replied or timed out
//! - The HTTP server exposing the JSON-RPC endpoint, the well-known agent
//!   card, and health/metrics probes
//!
//! # Quick Start
//!
//! ```rust
//! use a2a_orchestrator::protocol::{Message, TaskSendParams};
//!
//! // Parameters as a caller would submit them via tasks/send
//! let params = TaskSendParams {
//!     id: "task-1".to_string(),
//!     session_id: None,
//!     message: Message::user_text("Plan a night out in Amsterdam"),
//!     accepted_output_modes: vec!["text".to_string()],
//!     metadata: None,
//! };
//!
//! let json = serde_json::to_string(&params).unwrap();
//! assert!(json.contains("\"parts\""));
//! ```

pub mod aggregator;
pub mod client;
pub mod config;
pub mod error;
pub mod observability;
pub mod orchestrator;
pub mod protocol;
pub mod registry;
pub mod routing;
pub mod server;
pub mod testing;

pub use aggregator::{AggregateResult, AgentOutcome, OutcomeKind, ResponseAggregator};
pub use client::{AgentConnection, CardResolver, RemoteAgentClient};
pub use config::*;
pub use error::{OrchestratorError, OrchestratorResult};
pub use orchestrator::{ConnectionFactory, HttpConnectionFactory, Orchestrator};
pub use protocol::*;
pub use registry::{AgentEntry, AgentRegistry};
pub use routing::{DispatchPlan, DispatchRequest, Router, SkillRouter};
pub use server::A2aServer;
