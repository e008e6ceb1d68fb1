//! MCP server for Ley 27.401 compliance scoring.
//!
//! Every input line is handled on its own: parsed, validated, routed and
//! answered before the next line is read. There is no session state, so
//! `initialize` may be called at any time and does not gate other methods.
//!
//! # Routing
//!
//! | method       | handler                                  |
//! |--------------|------------------------------------------|
//! | `initialize` | fixed capabilities and server identity   |
//! | `tools/list` | the static tool catalogue                |
//! | `tools/call` | one of the [`tools`](crate::mcp::tools)  |
//!
//! Anything else is `-32601`. Tool failures never escape the dispatcher:
//! handler errors become JSON-RPC errors and panics become `-32603`.

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::error::ToolError;
use crate::mcp::protocol::{
    parse_message, JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION,
    SERVER_NAME,
};
use crate::mcp::tools::{tool_definitions, ToolCallResult, ToolHandler, Toolbox};
use crate::mcp::transport::{LineTransport, StdioTransport};

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    pub tools: ToolCapabilities,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            tools: ToolCapabilities {},
        }
    }
}

/// Tool-specific capabilities. The tool list never changes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapabilities {}

/// Server information for initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Parameters for tools/call request.
#[derive(Debug, Clone)]
struct ToolCallParams {
    name: String,
    arguments: Value,
}

impl ToolCallParams {
    fn from_params(params: Option<&Value>) -> Result<Self, String> {
        let params = params
            .and_then(Value::as_object)
            .ok_or("Missing tool call params")?;
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or("Missing or invalid tool name")?;
        let arguments = params
            .get("arguments")
            .filter(|a| a.is_object())
            .ok_or("Missing or invalid tool arguments (object expected)")?;

        Ok(Self {
            name: name.to_string(),
            arguments: arguments.clone(),
        })
    }
}

/// The compliance MCP server.
pub struct McpServer<T = Toolbox> {
    tools: T,
}

impl<T: ToolHandler> McpServer<T> {
    /// Creates a new MCP server around the given tools.
    #[must_use]
    pub const fn new(tools: T) -> Self {
        Self { tools }
    }

    /// Runs the server over stdio until EOF or a termination signal.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&self) -> std::io::Result<()> {
        let mut transport = StdioTransport::stdio();
        self.serve(&mut transport, shutdown_signal()).await
    }

    /// Serves requests until EOF or until `shutdown` completes.
    ///
    /// A request already being handled when `shutdown` fires is answered
    /// before the loop exits.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn serve<R, W, F>(
        &self,
        transport: &mut LineTransport<R, W>,
        shutdown: F,
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("Shutdown requested, no longer reading input");
                    return Ok(());
                }

                line = transport.read_line() => {
                    let Some(line) = line? else {
                        tracing::info!("Input closed");
                        return Ok(());
                    };
                    if let Some(response) = self.handle_bytes(&line) {
                        transport.write_response(&response).await?;
                    }
                }
            }
        }
    }

    /// Handles one raw input line. Blank lines produce no response.
    #[must_use]
    pub fn handle_bytes(&self, line: &[u8]) -> Option<JsonRpcResponse> {
        match std::str::from_utf8(line) {
            Ok(text) => self.handle_line(text),
            Err(e) => {
                tracing::warn!(error = %e, "Input line is not valid UTF-8");
                Some(JsonRpcError::parse_error(e).into())
            }
        }
    }

    /// Handles one input line. Blank lines produce no response.
    #[must_use]
    pub fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        if line.trim().is_empty() {
            return None;
        }

        let response = match parse_message(line) {
            Ok(req) => self.handle_request(&req).unwrap_or_else(Into::into),
            Err(error) => {
                tracing::warn!(
                    code = error.error.code,
                    detail = %error.error.message,
                    "Rejected input line"
                );
                error.into()
            }
        };
        Some(response)
    }

    /// Routes a validated request.
    fn handle_request(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        tracing::debug!(id = %req.id, method = %req.method, "Handling request");

        match req.method.as_str() {
            "initialize" => Ok(Self::handle_initialize(req)),
            "tools/list" => Ok(Self::handle_tools_list(req)),
            "tools/call" => self.handle_tools_call(req),
            _ => Err(JsonRpcError::method_not_found(req.id.clone(), &req.method)),
        }
    }

    /// Handles the initialize request. Params are ignored.
    fn handle_initialize(req: &JsonRpcRequest) -> JsonRpcResponse {
        tracing::info!("Client initialised session");

        let result = json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default(),
        });

        JsonRpcResponse::success(req.id.clone(), result)
    }

    /// Handles the tools/list request.
    fn handle_tools_list(req: &JsonRpcRequest) -> JsonRpcResponse {
        let result = json!({
            "tools": tool_definitions(),
        });

        JsonRpcResponse::success(req.id.clone(), result)
    }

    /// Handles the tools/call request.
    fn handle_tools_call(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        let params = ToolCallParams::from_params(req.params.as_ref())
            .map_err(|message| JsonRpcError::invalid_params(req.id.clone(), message))?;

        let result = run_contained(|| self.tools.run_tool(&params.name, &params.arguments))
            .map_err(|err| {
                tracing::warn!(tool = %params.name, error = %err, "Tool call failed");
                tool_error_to_rpc(req, err)
            })?;

        let result_value = serde_json::to_value(&result).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialise tool call result");
            JsonRpcError::internal_error(req.id.clone(), "failed to serialise result")
        })?;

        Ok(JsonRpcResponse::success(req.id.clone(), result_value))
    }
}

fn tool_error_to_rpc(req: &JsonRpcRequest, err: ToolError) -> JsonRpcError {
    let id = req.id.clone();
    match err {
        ToolError::NotFound { .. } => JsonRpcError::method_not_found(id, &err.to_string()),
        ToolError::InvalidParams { message } => JsonRpcError::invalid_params(id, message),
        ToolError::Internal { message } => JsonRpcError::internal_error(id, message),
    }
}

/// Runs a tool handler, turning a panic into [`ToolError::Internal`].
fn run_contained<F>(f: F) -> Result<ToolCallResult, ToolError>
where
    F: FnOnce() -> Result<ToolCallResult, ToolError>,
{
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        tracing::error!(panic = %message, "Tool handler panicked");
        Err(ToolError::Internal { message })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "tool handler panicked".to_string()
    }
}

/// Completes when the process receives SIGINT or SIGTERM.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let (Ok(mut sigint), Ok(mut sigterm)) = (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    ) else {
        tracing::warn!("Could not install signal handlers; relying on EOF for shutdown");
        return std::future::pending().await;
    };

    tokio::select! {
        _ = sigint.recv() => tracing::info!("Received SIGINT, initiating graceful shutdown"),
        _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

/// Completes when the process receives Ctrl+C.
#[cfg(windows)]
pub async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Received Ctrl+C, initiating graceful shutdown");
    } else {
        std::future::pending::<()>().await;
    }
}
