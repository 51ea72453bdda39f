//! # Tool Endpoint
//!
//! A JSON-RPC 2.0 endpoint in the shape MCP clients expect.
//!
//! | Method        | Result                                              |
//! |---------------|-----------------------------------------------------|
//! | `initialize`  | protocol version, capabilities, server info          |
//! | `tools/list`  | `validate_config` and `validate_segment` definitions |
//! | `tools/call`  | the engine's `ValidationResult` as pretty JSON text  |
//!
//! `GET /mcp` returns the same server description without the JSON-RPC
//! envelope. Notifications (`notifications/*`) are acknowledged with 202
//! and no body.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use promptcfg_schema::RequestedFormat;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{RpcError, RpcFailure};
use crate::state::AppState;

/// Server name reported to clients.
pub const SERVER_NAME: &str = "promptcfg-validator";

/// MCP protocol revision this endpoint speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// The tool that validates a whole configuration.
pub const VALIDATE_CONFIG: &str = "validate_config";

/// The tool that validates one segment.
pub const VALIDATE_SEGMENT: &str = "validate_segment";

pub fn router() -> Router<AppState> {
    Router::new().route("/mcp", get(server_info).post(handle_rpc))
}

// -- Tool definitions --------------------------------------------------------

fn input_schema(subject: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "content": {
                "type": "string",
                "description": format!("The {subject} content as a string (JSON, YAML, or TOML)")
            },
            "format": {
                "type": "string",
                "enum": ["json", "yaml", "toml", "auto"],
                "description": format!("The format of the {subject} (auto-detect if not specified)"),
                "default": "auto"
            }
        },
        "required": ["content"]
    })
}

/// Definitions of every tool this endpoint serves.
pub fn tool_definitions() -> Value {
    json!([
        {
            "name": VALIDATE_CONFIG,
            "description": "Validate a prompt configuration against the schema. Supports JSON, YAML, and TOML formats.",
            "inputSchema": input_schema("configuration")
        },
        {
            "name": VALIDATE_SEGMENT,
            "description": "Validate a single prompt segment against the schema, without a surrounding configuration.",
            "inputSchema": input_schema("segment")
        }
    ])
}

async fn server_info() -> Json<Value> {
    Json(json!({
        "name": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Validates prompt configurations and segments against the published schema",
        "capabilities": { "tools": {} },
        "tools": tool_definitions()
    }))
}

// -- JSON-RPC dispatch -------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ToolCall {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct ValidateArgs {
    content: String,
    #[serde(default)]
    format: Option<String>,
}

async fn handle_rpc(State(state): State<AppState>, body: Bytes) -> Result<Response, RpcFailure> {
    let message: Value =
        serde_json::from_slice(&body).map_err(|e| RpcError::Parse(e.to_string()).with_id(Value::Null))?;

    let id = message.get("id").cloned().unwrap_or(Value::Null);
    let invalid = || {
        RpcError::InvalidRequest("Not a valid JSON-RPC 2.0 message".to_string()).with_id(id.clone())
    };

    if message.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return Err(invalid());
    }
    let method = message.get("method").and_then(Value::as_str).ok_or_else(invalid)?;

    if method.starts_with("notifications/") {
        tracing::debug!(method, "notification acknowledged");
        return Ok(StatusCode::ACCEPTED.into_response());
    }

    tracing::debug!(method, "handling JSON-RPC request");
    let params = message.get("params").cloned().unwrap_or(Value::Null);
    let result = match method {
        "initialize" => initialize(),
        "tools/list" => json!({ "tools": tool_definitions() }),
        "tools/call" => call_tool(&state, params).await.map_err(|e| e.with_id(id.clone()))?,
        other => return Err(RpcError::MethodNotFound(other.to_string()).with_id(id)),
    };

    Ok(Json(json!({ "jsonrpc": "2.0", "result": result, "id": id })).into_response())
}

fn initialize() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

async fn call_tool(state: &AppState, params: Value) -> Result<Value, RpcError> {
    let call: ToolCall =
        serde_json::from_value(params).map_err(|e| RpcError::InvalidParams(e.to_string()))?;

    if call.name != VALIDATE_CONFIG && call.name != VALIDATE_SEGMENT {
        return Err(RpcError::UnknownTool(call.name));
    }

    let args: ValidateArgs =
        serde_json::from_value(call.arguments).map_err(|e| RpcError::InvalidParams(e.to_string()))?;
    let format: RequestedFormat = args
        .format
        .as_deref()
        .unwrap_or("auto")
        .parse()
        .map_err(|e: promptcfg_schema::UnknownFormat| RpcError::InvalidParams(e.to_string()))?;

    let result = if call.name == VALIDATE_SEGMENT {
        state.validator.validate_segment(&args.content, format).await
    } else {
        state.validator.validate_config(&args.content, format).await
    };
    tracing::info!(tool = %call.name, valid = result.valid, errors = result.errors.len(), "tool call");

    let text = serde_json::to_string_pretty(&result).map_err(|e| RpcError::Internal(e.to_string()))?;
    Ok(json!({ "content": [{ "type": "text", "text": text }] }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_tools_are_defined() {
        let tools = tool_definitions();
        let names: Vec<&str> = tools
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, [VALIDATE_CONFIG, VALIDATE_SEGMENT]);
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["content"]));
        assert_eq!(tools[1]["inputSchema"]["properties"]["format"]["default"], "auto");
    }

    #[test]
    fn initialize_reports_protocol_and_server() {
        let result = initialize();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
    }
}
