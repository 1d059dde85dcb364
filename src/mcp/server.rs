//! MCP server hosting the CAD tool surface.
//!
//! Lifecycle: `initialize` → `notifications/initialized` → running. While
//! running the server answers `tools/list`, `tools/call`, and `ping`.
//! Shutdown happens on SIGINT/SIGTERM or stdin EOF.
//!
//! The server owns the tool registry and the command bridge; each
//! `tools/call` is a single linear sequence of bridge exchanges with no
//! retry and no cross-call state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::bridge::CommandBridge;
use crate::mcp::protocol::{
    parse_message, ErrorResponse, Message, Notification, Request, RequestId, Response,
    MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use crate::mcp::transport::StdioTransport;
use crate::tools::{ToolOutput, ToolRegistry};

/// Server state in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for the initialize request.
    AwaitingInit,
    /// Initialize received, waiting for the initialized notification.
    Initialising,
    /// Ready for normal operation.
    Running,
    /// Shutdown in progress.
    ShuttingDown,
}

/// Parameters for the initialize request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by the client.
    pub protocol_version: String,
    /// Client capabilities.
    #[serde(default)]
    pub capabilities: Value,
    /// Client information.
    #[serde(default)]
    pub client_info: Option<Value>,
}

/// Parameters for the tools/call request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// MCP-shaped result of a tool call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the call resulted in an error.
    #[serde(skip_serializing_if = "is_false")]
    pub is_error: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires fn(&T) -> bool
const fn is_false(b: &bool) -> bool {
    !*b
}

impl From<ToolOutput> for ToolCallResult {
    fn from(output: ToolOutput) -> Self {
        Self {
            content: vec![ToolContent::Text { text: output.text }],
            is_error: output.is_error,
        }
    }
}

impl ToolCallResult {
    /// Creates an error text result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }
}

/// The MCP server for BRL-CAD geometry tools.
pub struct McpServer {
    state: ServerState,
    transport: StdioTransport,
    registry: ToolRegistry,
    bridge: Arc<dyn CommandBridge>,
}

impl McpServer {
    /// Creates a server hosting `registry` against `bridge`.
    #[must_use]
    pub fn new(registry: ToolRegistry, bridge: Arc<dyn CommandBridge>) -> Self {
        Self {
            state: ServerState::AwaitingInit,
            transport: StdioTransport::new(),
            registry,
            bridge,
        }
    }

    /// Returns the current server state.
    #[must_use]
    pub const fn state(&self) -> ServerState {
        self.state
    }

    /// Runs the MCP server main loop with graceful shutdown handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&mut self) -> std::io::Result<()> {
        self.run_with_shutdown().await
    }

    #[cfg(unix)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(std::io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(std::io::Error::other)?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    #[cfg(windows)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Handles the result from a transport read.
    ///
    /// Returns `true` if the server should shut down.
    async fn handle_transport_result(
        &mut self,
        line_result: std::io::Result<Option<String>>,
    ) -> std::io::Result<bool> {
        let Some(line) = line_result? else {
            self.state = ServerState::ShuttingDown;
            return Ok(true);
        };

        if line.trim().is_empty() {
            return Ok(false);
        }

        match parse_message(&line) {
            Ok(msg) => self.handle_message(msg).await?,
            Err(error) => self.transport.send(&error).await?,
        }

        Ok(self.state == ServerState::ShuttingDown)
    }

    async fn handle_message(&mut self, msg: Message) -> std::io::Result<()> {
        match msg {
            Message::Request(req) => self.handle_request(req).await,
            Message::Notification(ref notif) => {
                self.handle_notification(notif);
                Ok(())
            }
        }
    }

    async fn handle_request(&mut self, req: Request) -> std::io::Result<()> {
        let response = match req.method.as_str() {
            "initialize" => self.handle_initialize(&req),
            "tools/list" => self.handle_tools_list(&req),
            "tools/call" => self.handle_tools_call(&req).await,
            "ping" => Ok(Self::handle_ping(&req)),
            _ => Err(ErrorResponse::method_not_found(req.id.clone(), &req.method)),
        };

        match response {
            Ok(resp) => self.transport.send(&resp).await,
            Err(error) => self.transport.send(&error).await,
        }
    }

    fn handle_notification(&mut self, notif: &Notification) {
        if notif.method == "notifications/initialized" && self.state == ServerState::Initialising {
            self.state = ServerState::Running;
        }
    }

    fn handle_initialize(&mut self, req: &Request) -> Result<Response, ErrorResponse> {
        if self.state != ServerState::AwaitingInit {
            return Err(ErrorResponse::invalid_state(
                req.id.clone(),
                "Server already initialised",
            ));
        }

        let _params: InitializeParams = req
            .params
            .as_ref()
            .map(|p| serde_json::from_value(p.clone()))
            .transpose()
            .map_err(|e| {
                ErrorResponse::invalid_params(
                    req.id.clone(),
                    format!("Invalid initialize params: {e}"),
                )
            })?
            .ok_or_else(|| {
                ErrorResponse::invalid_params(req.id.clone(), "Missing initialize params")
            })?;

        self.state = ServerState::Initialising;

        let result = json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
        });

        Ok(Response::success(req.id.clone(), result))
    }

    fn handle_tools_list(&self, req: &Request) -> Result<Response, ErrorResponse> {
        self.require_running(&req.id)?;

        let tools: Vec<_> = self.registry.definitions().collect();
        Ok(Response::success(req.id.clone(), json!({ "tools": tools })))
    }

    async fn handle_tools_call(&mut self, req: &Request) -> Result<Response, ErrorResponse> {
        self.require_running(&req.id)?;

        let params: ToolCallParams = req
            .params
            .as_ref()
            .map(|p| serde_json::from_value(p.clone()))
            .transpose()
            .map_err(|e| {
                ErrorResponse::invalid_params(
                    req.id.clone(),
                    format!("Invalid tool call params: {e}"),
                )
            })?
            .ok_or_else(|| {
                ErrorResponse::invalid_params(req.id.clone(), "Missing tool call params")
            })?;

        // Bridge failures surface through the MCP tool-error path; they are
        // not retried and not converted to JSON-RPC errors.
        let result = match self
            .registry
            .call(&params.name, &params.arguments, self.bridge.as_ref())
            .await
        {
            Ok(output) => ToolCallResult::from(output),
            Err(e) => {
                tracing::warn!(tool = %params.name, error = %e, "bridge failure");
                ToolCallResult::error(e.to_string())
            }
        };

        let result_value = serde_json::to_value(&result).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialise tool call result");
            ErrorResponse::internal_error(
                req.id.clone(),
                "Internal error: failed to serialise result",
            )
        })?;

        Ok(Response::success(req.id.clone(), result_value))
    }

    fn handle_ping(req: &Request) -> Response {
        Response::success(req.id.clone(), json!({}))
    }

    fn require_running(&self, id: &RequestId) -> Result<(), ErrorResponse> {
        if self.state != ServerState::Running {
            return Err(ErrorResponse::invalid_state(
                id.clone(),
                "Server not initialised",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::error::BridgeError;

    struct StubBridge {
        calls: Mutex<Vec<String>>,
    }

    impl StubBridge {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CommandBridge for StubBridge {
        async fn send_command(&self, cmd: &str) -> Result<String, BridgeError> {
            self.calls.lock().unwrap().push(cmd.to_string());
            Ok("SUCCESS".to_string())
        }
    }

    fn request(id: i64, method: &str, params: Value) -> Request {
        Request {
            jsonrpc: "2.0".to_string(),
            id: RequestId::Number(id),
            method: method.to_string(),
            params: Some(params),
        }
    }

    fn server_with_stub() -> (McpServer, Arc<StubBridge>) {
        let stub = StubBridge::new();
        let server = McpServer::new(ToolRegistry::builtin(), stub.clone());
        (server, stub)
    }

    #[test]
    fn initialize_transitions_state() {
        let (mut server, _stub) = server_with_stub();
        assert_eq!(server.state(), ServerState::AwaitingInit);

        let req = request(1, "initialize", json!({"protocolVersion": "2024-11-05"}));
        let resp = server.handle_initialize(&req).unwrap();
        assert_eq!(server.state(), ServerState::Initialising);
        assert_eq!(
            resp.result.get("protocolVersion").and_then(Value::as_str),
            Some(MCP_PROTOCOL_VERSION)
        );

        server.handle_notification(&Notification {
            jsonrpc: "2.0".to_string(),
            method: "notifications/initialized".to_string(),
            params: None,
        });
        assert_eq!(server.state(), ServerState::Running);
    }

    #[test]
    fn double_initialize_is_rejected() {
        let (mut server, _stub) = server_with_stub();
        let req = request(1, "initialize", json!({"protocolVersion": "2024-11-05"}));
        server.handle_initialize(&req).unwrap();
        assert!(server.handle_initialize(&req).is_err());
    }

    #[test]
    fn tools_list_requires_running_state() {
        let (server, _stub) = server_with_stub();
        let req = request(2, "tools/list", json!({}));
        assert!(server.handle_tools_list(&req).is_err());
    }

    #[test]
    fn tools_list_returns_catalog() {
        let (mut server, _stub) = server_with_stub();
        server.state = ServerState::Running;

        let req = request(2, "tools/list", json!({}));
        let resp = server.handle_tools_list(&req).unwrap();
        let tools = resp.result.get("tools").and_then(Value::as_array).unwrap();
        assert_eq!(tools.len(), 4);
    }

    #[tokio::test]
    async fn tools_call_dispatches_to_registry() {
        let (mut server, stub) = server_with_stub();
        server.state = ServerState::Running;

        let req = request(
            3,
            "tools/call",
            json!({
                "name": "create_sphere",
                "arguments": {"name": "ball.s", "x": 0, "y": 0, "z": 0, "radius": 10}
            }),
        );

        let resp = server.handle_tools_call(&req).await.unwrap();
        let text = resp.result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("ball.s"));
        assert!(text.contains("SUCCESS"));
        assert_eq!(stub.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn tools_call_unknown_tool_is_tool_error() {
        let (mut server, stub) = server_with_stub();
        server.state = ServerState::Running;

        let req = request(4, "tools/call", json!({"name": "extrude", "arguments": {}}));
        let resp = server.handle_tools_call(&req).await.unwrap();
        assert_eq!(resp.result.get("isError").and_then(Value::as_bool), Some(true));
        assert!(stub.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn tool_call_result_serialises_error_flag() {
        let result = ToolCallResult::error("boom");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json.get("isError").and_then(Value::as_bool), Some(true));

        let ok = ToolCallResult::from(ToolOutput::text("fine"));
        let json = serde_json::to_value(&ok).unwrap();
        assert!(json.get("isError").is_none());
    }
}
