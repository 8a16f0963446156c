//! JSON-RPC 2.0 framing for the A2A endpoint
//!
//! The orchestrator speaks JSON-RPC over HTTP POST. This module defines the
//! request/response envelope, the supported method names, and the error codes
//! returned to callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC protocol version string
pub const JSONRPC_VERSION: &str = "2.0";

/// Supported A2A method names
pub mod methods {
    pub const TASKS_SEND: &str = "tasks/send";
    pub const TASKS_GET: &str = "tasks/get";
    pub const TASKS_CANCEL: &str = "tasks/cancel";
    pub const AGENTS_REGISTER: &str = "agents/register";
    pub const AGENTS_LIST: &str = "agents/list";
}

/// JSON-RPC error codes
///
/// Standard codes per the JSON-RPC 2.0 spec, plus A2A-specific codes in the
/// -32000 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    TaskNotFound,
    TaskNotCancelable,
    AgentNotFound,
    NoAgentAvailable,
    DispatchFailed,
}

impl ErrorCode {
    /// Numeric wire code
    pub fn code(&self) -> i64 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
            ErrorCode::TaskNotFound => -32001,
            ErrorCode::TaskNotCancelable => -32002,
            ErrorCode::AgentNotFound => -32003,
            ErrorCode::NoAgentAvailable => -32004,
            ErrorCode::DispatchFailed => -32005,
        }
    }

    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::MethodNotFound => "Method not found",
            ErrorCode::InvalidParams => "Invalid parameters",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::TaskNotFound => "Task not found",
            ErrorCode::TaskNotCancelable => "Task cannot be canceled",
            ErrorCode::AgentNotFound => "Agent not found",
            ErrorCode::NoAgentAvailable => "No agent available for request",
            ErrorCode::DispatchFailed => "Dispatch to remote agent failed",
        }
    }
}

/// JSON-RPC request envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    /// Request id; null for notifications (not used by this server)
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Build a request with a string id
    pub fn new<S: Into<String>>(id: S, method: &str, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(Value::String(id.into())),
            method: method.to_string(),
            params: Some(params),
        }
    }

    /// Validate the envelope version
    pub fn is_valid_version(&self) -> bool {
        self.jsonrpc == JSONRPC_VERSION
    }
}

/// JSON-RPC response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Build a success response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Build an error response with the code's default message
    pub fn error(id: Option<Value>, code: ErrorCode) -> Self {
        Self::error_with_message(id, code, code.message().to_string())
    }

    /// Build an error response with a custom message
    pub fn error_with_message(id: Option<Value>, code: ErrorCode, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: code.code(),
                message,
                data: None,
            }),
        }
    }

    /// Check whether this response carries an error
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}
