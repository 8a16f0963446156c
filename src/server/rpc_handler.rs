//! JSON-RPC method dispatch
//!
//! Decodes the request envelope, routes to the orchestrator operation for the
//! method, and maps failures to protocol error codes. Malformed bodies get
//! `-32700`, bad envelopes `-32600`, unknown methods `-32601`, and parameter
//! decode failures `-32602`; orchestrator errors carry their own codes.

use crate::orchestrator::Orchestrator;
use crate::protocol::messages::{AgentCard, TaskQueryParams, TaskSendParams};
use crate::protocol::rpc::{methods, ErrorCode, JsonRpcRequest, JsonRpcResponse};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Handle one JSON-RPC request body
pub async fn dispatch(body: &[u8], orchestrator: Arc<Orchestrator>) -> JsonRpcResponse {
    let request: JsonRpcRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Unparseable RPC body: {}", e);
            return JsonRpcResponse::error(None, ErrorCode::ParseError);
        }
    };

    if !request.is_valid_version() {
        return JsonRpcResponse::error(request.id, ErrorCode::InvalidRequest);
    }

    let id = request.id.clone();
    debug!(method = %request.method, "RPC request");

    match request.method.as_str() {
        methods::TASKS_SEND => {
            let params: TaskSendParams = match decode_params(request.params) {
                Ok(params) => params,
                Err(detail) => return invalid_params(id, detail),
            };
            result_to_response(id, orchestrator.send_task(params).await)
        }
        methods::TASKS_GET => {
            let params: TaskQueryParams = match decode_params(request.params) {
                Ok(params) => params,
                Err(detail) => return invalid_params(id, detail),
            };
            result_to_response(id, orchestrator.get_task(&params.id))
        }
        methods::TASKS_CANCEL => {
            let params: TaskQueryParams = match decode_params(request.params) {
                Ok(params) => params,
                Err(detail) => return invalid_params(id, detail),
            };
            result_to_response(id, orchestrator.cancel_task(&params.id))
        }
        methods::AGENTS_REGISTER => {
            let card: AgentCard = match decode_params(request.params) {
                Ok(card) => card,
                Err(detail) => return invalid_params(id, detail),
            };
            if card.name.trim().is_empty() {
                return invalid_params(id, "agent card name must not be empty".to_string());
            }
            if url::Url::parse(&card.url).is_err() {
                return invalid_params(id, format!("invalid agent url '{}'", card.url));
            }
            let registered = orchestrator.register_agent(card);
            result_to_response(id, Ok::<_, crate::error::OrchestratorError>(registered))
        }
        methods::AGENTS_LIST => {
            result_to_response(
                id,
                Ok::<_, crate::error::OrchestratorError>(orchestrator.list_agents()),
            )
        }
        other => {
            warn!("Unknown RPC method: {}", other);
            JsonRpcResponse::error(id, ErrorCode::MethodNotFound)
        }
    }
}

fn decode_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, String> {
    serde_json::from_value(params.unwrap_or(Value::Null)).map_err(|e| e.to_string())
}

fn invalid_params(id: Option<Value>, detail: String) -> JsonRpcResponse {
    JsonRpcResponse::error_with_message(
        id,
        ErrorCode::InvalidParams,
        format!("Invalid parameters: {detail}"),
    )
}

fn result_to_response<T: serde::Serialize>(
    id: Option<Value>,
    result: Result<T, crate::error::OrchestratorError>,
) -> JsonRpcResponse {
    match result {
        Ok(value) => JsonRpcResponse::success(id, json!(value)),
        Err(e) => {
            let rpc_error = e.to_rpc_error();
            JsonRpcResponse {
                jsonrpc: crate::protocol::rpc::JSONRPC_VERSION.to_string(),
                id,
                result: None,
                error: Some(rpc_error),
            }
        }
    }
}
