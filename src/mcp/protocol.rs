//! JSON-RPC 2.0 message types for the MCP protocol.
//!
//! # Validation
//!
//! Each input line is checked in order, stopping at the first failure:
//!
//! 1. The line is a single valid JSON value (`-32700`)
//! 2. It is an object whose `method` is a string (`-32600`)
//! 3. `id`, if present, is a string, number or `null` (`-32600`)
//! 4. No top-level keys besides `jsonrpc`, `method`, `params`, `id` (`-32600`)
//! 5. `jsonrpc` is exactly `"2.0"` (`-32600`)
//!
//! # Request IDs
//!
//! Every request gets a response. A request without an `id` member is
//! answered with a server-generated UUID; an explicit `null` is echoed.

use serde::Serialize;
use serde_json::{Map, Value};

/// The MCP protocol version this implementation supports.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name for capability negotiation.
pub const SERVER_NAME: &str = "integridai-mcp";

/// Top-level keys a request may carry.
const ALLOWED_KEYS: &[&str] = &["jsonrpc", "method", "params", "id"];

/// A JSON-RPC 2.0 request ID.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric request ID.
    Number(serde_json::Number),
    /// String request ID.
    String(String),
    /// Explicit `null`, or unknown because the request was unreadable.
    Null,
}

impl RequestId {
    /// Reads an ID from a JSON value, rejecting booleans, arrays and objects.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Null => Some(Self::Null),
            _ => None,
        }
    }

    /// Creates a fresh ID for a request that did not carry one.
    #[must_use]
    pub fn generate() -> Self {
        Self::String(uuid::Uuid::new_v4().to_string())
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Null => write!(f, "null"),
        }
    }
}

/// A validated JSON-RPC 2.0 request.
#[derive(Debug, Clone)]
pub struct JsonRpcRequest {
    /// Request identifier, generated if the request had none.
    pub id: RequestId,

    /// The method to invoke.
    pub method: String,

    /// Parameters for the method, passed through untouched.
    pub params: Option<Value>,
}

/// Standard JSON-RPC 2.0 error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid JSON was received by the server.
    ParseError,
    /// The JSON sent is not a valid Request object.
    InvalidRequest,
    /// The method does not exist or is not available.
    MethodNotFound,
    /// Invalid method parameters.
    InvalidParams,
    /// Internal JSON-RPC error.
    InternalError,
}

impl ErrorCode {
    /// Returns the numeric code for this error.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
        }
    }

    /// Returns the default message for this error code.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid Request",
            Self::MethodNotFound => "Method not found",
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcErrorData {
    /// The error code.
    pub code: i32,

    /// A short description of the error.
    pub message: String,
}

impl JsonRpcErrorData {
    /// Creates a new error with the code's default message.
    #[must_use]
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code: code.code(),
            message: code.default_message().to_string(),
        }
    }

    /// Creates a new error with the default message followed by `detail`.
    #[must_use]
    pub fn with_detail(code: ErrorCode, detail: impl std::fmt::Display) -> Self {
        Self {
            code: code.code(),
            message: format!("{}: {detail}", code.default_message()),
        }
    }
}

/// A failed request: the ID to answer and the error to report.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcError {
    /// The request ID this error corresponds to.
    pub id: RequestId,

    /// The error details.
    pub error: JsonRpcErrorData,
}

impl JsonRpcError {
    /// Creates a new error.
    #[must_use]
    pub const fn new(id: RequestId, error: JsonRpcErrorData) -> Self {
        Self { id, error }
    }

    /// Creates a parse error (ID cannot be determined).
    #[must_use]
    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::new(
            RequestId::Null,
            JsonRpcErrorData::with_detail(ErrorCode::ParseError, detail),
        )
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(id: RequestId, detail: impl std::fmt::Display) -> Self {
        Self::new(
            id,
            JsonRpcErrorData::with_detail(ErrorCode::InvalidRequest, detail),
        )
    }

    /// Creates a method not found error.
    #[must_use]
    pub fn method_not_found(id: RequestId, method: &str) -> Self {
        Self::new(
            id,
            JsonRpcErrorData::with_detail(ErrorCode::MethodNotFound, method),
        )
    }

    /// Creates an invalid params error.
    #[must_use]
    pub fn invalid_params(id: RequestId, detail: impl std::fmt::Display) -> Self {
        Self::new(
            id,
            JsonRpcErrorData::with_detail(ErrorCode::InvalidParams, detail),
        )
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal_error(id: RequestId, detail: impl std::fmt::Display) -> Self {
        Self::new(
            id,
            JsonRpcErrorData::with_detail(ErrorCode::InternalError, detail),
        )
    }
}

/// The body of a response: exactly one of `result` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsePayload {
    /// Successful outcome.
    Result(Value),
    /// Failure details.
    Error(JsonRpcErrorData),
}

/// A JSON-RPC 2.0 response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcResponse {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this response corresponds to.
    pub id: RequestId,

    /// Result or error.
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

impl JsonRpcResponse {
    /// Creates a new success response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            payload: ResponsePayload::Result(result),
        }
    }

    /// Returns the error code if this is an error response.
    #[must_use]
    pub const fn error_code(&self) -> Option<i32> {
        match &self.payload {
            ResponsePayload::Error(e) => Some(e.code),
            ResponsePayload::Result(_) => None,
        }
    }
}

impl From<JsonRpcError> for JsonRpcResponse {
    fn from(err: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0",
            id: err.id,
            payload: ResponsePayload::Error(err.error),
        }
    }
}

/// Parses and validates one input line as a request.
///
/// # Errors
///
/// Returns a `JsonRpcError` if the JSON is malformed or not a valid request.
pub fn parse_message(json: &str) -> Result<JsonRpcRequest, JsonRpcError> {
    let value: Value = serde_json::from_str(json).map_err(JsonRpcError::parse_error)?;
    validate_request(value)
}

/// Validates an already-parsed JSON value as a request.
///
/// # Errors
///
/// Returns an invalid request error describing the first failed check.
pub fn validate_request(value: Value) -> Result<JsonRpcRequest, JsonRpcError> {
    let Value::Object(mut obj) = value else {
        return Err(JsonRpcError::invalid_request(
            RequestId::Null,
            "request must be a JSON object",
        ));
    };

    // Best-effort ID for errors reported before the ID itself is checked.
    let reported_id = obj
        .get("id")
        .and_then(RequestId::from_value)
        .unwrap_or(RequestId::Null);

    let method = match obj.get("method") {
        Some(Value::String(m)) => m.clone(),
        Some(_) => {
            return Err(JsonRpcError::invalid_request(
                reported_id,
                "method must be a string",
            ))
        }
        None => {
            return Err(JsonRpcError::invalid_request(
                reported_id,
                "missing method",
            ))
        }
    };

    let id = match obj.get("id") {
        None => RequestId::generate(),
        Some(value) => RequestId::from_value(value).ok_or_else(|| {
            JsonRpcError::invalid_request(RequestId::Null, "id must be a string, number or null")
        })?,
    };

    if let Some(key) = first_unknown_key(&obj) {
        return Err(JsonRpcError::invalid_request(
            id,
            format!("unexpected member '{key}'"),
        ));
    }

    if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return Err(JsonRpcError::invalid_request(
            id,
            "jsonrpc field must be \"2.0\"",
        ));
    }

    Ok(JsonRpcRequest {
        id,
        method,
        params: obj.remove("params"),
    })
}

fn first_unknown_key(obj: &Map<String, Value>) -> Option<&str> {
    obj.keys()
        .map(String::as_str)
        .find(|key| !ALLOWED_KEYS.contains(key))
}
