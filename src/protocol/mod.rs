//! A2A protocol types
//!
//! Wire-level types for agent-to-agent communication: agent cards, task
//! envelopes, message parts, and the JSON-RPC 2.0 framing used by the
//! orchestration endpoint.

pub mod messages;
pub mod rpc;

pub use messages::*;
pub use rpc::*;
