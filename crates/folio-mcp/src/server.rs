//! MCP server implementation.
//!
//! Dispatches JSON-RPC requests to the tool registry and the scoped
//! executor. The caller's identity travels with every request as a
//! [`RequestContext`]; the server itself holds no per-caller state.

use std::sync::Arc;

use folio_auth::AuthResolver;
use folio_core::{McpConfig, Transport};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::{McpError, ToolError};
use crate::executor::{ExecutionResult, ScopedExecutor};
use crate::http_transport::HttpServer;
use crate::protocol::*;
use crate::tools::ToolRegistry;

/// The MCP server.
pub struct McpServer {
    config: McpConfig,
    registry: Arc<ToolRegistry>,
    executor: Arc<ScopedExecutor>,
}

impl McpServer {
    pub fn new(config: McpConfig, registry: Arc<ToolRegistry>, executor: Arc<ScopedExecutor>) -> Self {
        Self {
            config,
            registry,
            executor,
        }
    }

    pub fn config(&self) -> &McpConfig {
        &self.config
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Start the MCP server on the configured transport.
    ///
    /// `stdio_token` is the credential for the single stdio session; HTTP
    /// callers present theirs on every request.
    pub async fn run(
        self: Arc<Self>,
        resolver: Arc<AuthResolver>,
        stdio_token: Option<String>,
    ) -> Result<(), McpError> {
        match self.config.transport {
            Transport::Stdio => self.run_stdio(&resolver, stdio_token).await,
            Transport::Http => self.run_http(resolver).await,
        }
    }

    /// Run the server with stdio transport.
    async fn run_stdio(
        &self,
        resolver: &AuthResolver,
        stdio_token: Option<String>,
    ) -> Result<(), McpError> {
        tracing::info!(tools = self.registry.len(), "Starting MCP server with stdio transport");

        let context = RequestContext::from_resolution(resolver.resolve(stdio_token.as_deref()).await);
        if let Some(denial) = &context.denial {
            tracing::warn!(reason = denial.code(), "Stdio session has no valid credential; tool calls will be denied");
        }

        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve_lines(stdin, stdout, &context).await
    }

    /// Serve newline-delimited JSON-RPC until the reader is exhausted.
    pub async fn serve_lines<R, W>(
        &self,
        reader: R,
        mut writer: W,
        context: &RequestContext,
    ) -> Result<(), McpError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(line) {
                Ok(request) => self.handle_request(request, context).await,
                Err(e) => {
                    tracing::warn!(error = %e, "Unparseable JSON-RPC message");
                    Some(JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {}", e)))
                }
            };

            if let Some(response) = response {
                let response_json = serde_json::to_string(&response)?;
                writer.write_all(response_json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        Ok(())
    }

    /// Run the server with HTTP transport.
    async fn run_http(self: Arc<Self>, resolver: Arc<AuthResolver>) -> Result<(), McpError> {
        let host = self.config.host.clone();
        let port = self.config.port;
        HttpServer::new(host, port, self, resolver).run().await
    }

    /// Handle a JSON-RPC request. Notifications get no response.
    pub async fn handle_request(
        &self,
        request: JsonRpcRequest,
        context: &RequestContext,
    ) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!(method = %request.method, "Notification received");
            return None;
        }
        let id = request.id.clone();

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params, context).await,
            _ => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let info = ServerInfo {
            name: self.config.server_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        };
        let result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": info,
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            }
        });
        JsonRpcResponse::success(id, result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ListToolsResponse {
            tools: self.registry.definitions(),
        };
        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, e.to_string()),
        }
    }

    async fn handle_call_tool(
        &self,
        id: Option<Value>,
        params: Option<Value>,
        context: &RequestContext,
    ) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {}", e));
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        let Some(tool) = self.registry.get(&params.name) else {
            tracing::warn!(tool = %params.name, "Unknown tool requested");
            let result = ExecutionResult::error(ToolError::unknown_tool(&params.name));
            return execution_result_to_response(id, result);
        };

        if let Some(denial) = &context.denial {
            tracing::warn!(tool = %params.name, reason = denial.code(), "Tool call with rejected credential");
            let error = ToolError::scope_denied(format!("Credential rejected ({}): {}", denial.code(), denial));
            return execution_result_to_response(id, ExecutionResult::error(error));
        }

        let result = self
            .executor
            .call(
                &tool.descriptor,
                params.arguments,
                context.auth.as_ref(),
                &tool.analysis,
            )
            .await;

        execution_result_to_response(id, result)
    }
}

fn execution_result_to_response(id: Option<Value>, result: ExecutionResult) -> JsonRpcResponse {
    let response = CallToolResponse {
        content: result.content,
        structured_content: Some(result.structured),
        is_error: Some(!result.success),
    };
    match serde_json::to_value(response) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, e.to_string()),
    }
}
