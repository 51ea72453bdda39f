//! # JSON-RPC Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Every failure is answered with a JSON-RPC 2.0 error envelope carrying
//! the request id (or `null` when it could not be read). Envelope-level
//! failures use HTTP 400; method-level failures use HTTP 200 as JSON-RPC
//! over HTTP expects.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
}

/// JSON-RPC error envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub jsonrpc: String,
    pub error: ErrorObject,
    pub id: Value,
}

/// Transport-level failure of a JSON-RPC request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RpcError {
    /// Body is not JSON (-32700).
    #[error("Parse error: {0}")]
    Parse(String),

    /// Body is JSON but not a JSON-RPC 2.0 request (-32600).
    #[error("Invalid Request: {0}")]
    InvalidRequest(String),

    /// Unknown method (-32601).
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Unknown tool name in `tools/call` (-32601).
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Params missing or of the wrong shape (-32602).
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Anything else (-32603). The detail is logged, never returned.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RpcError {
    /// HTTP status and JSON-RPC error code for this error.
    fn status_and_code(&self) -> (StatusCode, i64) {
        match self {
            Self::Parse(_) => (StatusCode::BAD_REQUEST, -32700),
            Self::InvalidRequest(_) => (StatusCode::BAD_REQUEST, -32600),
            Self::MethodNotFound(_) | Self::UnknownTool(_) => (StatusCode::OK, -32601),
            Self::InvalidParams(_) => (StatusCode::OK, -32602),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, -32603),
        }
    }

    /// Attach the request id for the response envelope.
    pub fn with_id(self, id: Value) -> RpcFailure {
        RpcFailure { id, error: self }
    }
}

/// An [`RpcError`] bound to the request it answers.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcFailure {
    pub id: Value,
    pub error: RpcError,
}

impl IntoResponse for RpcFailure {
    fn into_response(self) -> Response {
        let (status, code) = self.error.status_and_code();

        let message = match &self.error {
            RpcError::Internal(_) => {
                tracing::error!(error = %self.error, "internal error handling request");
                "Internal error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorEnvelope {
            jsonrpc: "2.0".to_string(),
            error: ErrorObject { code, message },
            id: self.id,
        };
        (status, Json(body)).into_response()
    }
}
