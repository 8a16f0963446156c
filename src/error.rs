//! Error types for the A2A orchestration server
//!
//! Internal errors map to JSON-RPC error codes before leaving the process,
//! with message sanitization to keep secrets and sensitive paths out of
//! responses.

use crate::protocol::rpc::{ErrorCode, JsonRpcError};
use thiserror::Error;

/// Main error type for orchestrator operations
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Agent '{name}' not found in registry")]
    AgentNotFound { name: String },

    #[error("No agent available for skill '{skill}'")]
    NoAgentAvailable { skill: String },

    #[error("Task '{id}' not found")]
    TaskNotFound { id: String },

    #[error("Task '{id}' is in a terminal state and cannot be canceled")]
    TaskNotCancelable { id: String },

    #[error("Failed to resolve agent card from {url}: {message}")]
    CardResolution { url: String, message: String },

    #[error("Dispatch to agent '{agent}' failed: {message}")]
    Dispatch { agent: String, message: String },

    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl OrchestratorError {
    /// JSON-RPC error code for this error
    pub fn rpc_code(&self) -> ErrorCode {
        match self {
            OrchestratorError::AgentNotFound { .. } => ErrorCode::AgentNotFound,
            OrchestratorError::NoAgentAvailable { .. } => ErrorCode::NoAgentAvailable,
            OrchestratorError::TaskNotFound { .. } => ErrorCode::TaskNotFound,
            OrchestratorError::TaskNotCancelable { .. } => ErrorCode::TaskNotCancelable,
            OrchestratorError::CardResolution { .. } => ErrorCode::DispatchFailed,
            OrchestratorError::Dispatch { .. } => ErrorCode::DispatchFailed,
            OrchestratorError::InvalidParams { .. } => ErrorCode::InvalidParams,
            OrchestratorError::Config(_) => ErrorCode::InternalError,
            OrchestratorError::Http(_) => ErrorCode::DispatchFailed,
            OrchestratorError::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// Convert to a JSON-RPC error object with a sanitized message
    pub fn to_rpc_error(&self) -> JsonRpcError {
        JsonRpcError {
            code: self.rpc_code().code(),
            message: sanitize_error_message(&self.to_string()),
            data: None,
        }
    }

    /// Create an agent-not-found error
    pub fn agent_not_found<S: Into<String>>(name: S) -> Self {
        Self::AgentNotFound { name: name.into() }
    }

    /// Create a no-agent-available error
    pub fn no_agent_available<S: Into<String>>(skill: S) -> Self {
        Self::NoAgentAvailable {
            skill: skill.into(),
        }
    }

    /// Create a task-not-found error
    pub fn task_not_found<S: Into<String>>(id: S) -> Self {
        Self::TaskNotFound { id: id.into() }
    }

    /// Create a dispatch error
    pub fn dispatch<A: Into<String>, M: Into<String>>(agent: A, message: M) -> Self {
        Self::Dispatch {
            agent: agent.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-params error
    pub fn invalid_params<S: Into<String>>(message: S) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Sanitize error messages to prevent sensitive data leakage
fn sanitize_error_message(message: &str) -> String {
    let mut sanitized = message.to_string();

    // Remove common secret patterns
    sanitized = regex::Regex::new(r"(?i)(password|token|key|secret)[=:]\s*\S+")
        .unwrap()
        .replace_all(&sanitized, "${1}=***")
        .to_string();

    // Remove file paths that might contain sensitive info
    sanitized =
        regex::Regex::new(r"/[a-zA-Z0-9._/-]+/(secrets?|\.ssh|\.aws|\.config)/[a-zA-Z0-9._/-]+")
            .unwrap()
            .replace_all(&sanitized, "/***REDACTED***/")
            .to_string();

    // Truncate very long messages - ensure total length is <= 500. The cut
    // point walks back to a char boundary so multibyte text cannot panic.
    if sanitized.len() > 500 {
        let truncate_suffix = "...[truncated]";
        let mut cut = 500 - truncate_suffix.len();
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str(truncate_suffix);
    }

    sanitized
}

/// Result type for orchestrator operations
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
