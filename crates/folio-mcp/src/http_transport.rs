//! HTTP transport for the MCP server.
//!
//! JSON-RPC over `POST /mcp`. Each request is authorized on its own from the
//! `Authorization: Bearer` header, so one server serves many agents with
//! different scopes.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use folio_auth::AuthResolver;
use tower_http::trace::TraceLayer;

use crate::error::McpError;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, PARSE_ERROR, RequestContext};
use crate::server::McpServer;

/// HTTP transport handler state.
#[derive(Clone)]
pub struct HttpTransportState {
    server: Arc<McpServer>,
    resolver: Arc<AuthResolver>,
}

impl HttpTransportState {
    pub fn new(server: Arc<McpServer>, resolver: Arc<AuthResolver>) -> Self {
        Self { server, resolver }
    }
}

/// Create the HTTP router for MCP.
pub fn create_router(state: HttpTransportState) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp_post))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle POST requests to /mcp (JSON-RPC over HTTP).
async fn handle_mcp_post(
    State(state): State<HttpTransportState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            let response = JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {}", e));
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let context = RequestContext::from_resolution(state.resolver.resolve_header(header).await);
    if let Some(denial) = &context.denial {
        tracing::debug!(method = %request.method, reason = denial.code(), "Request without valid credential");
    }

    match state.server.handle_request(request, &context).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Handle health check requests.
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "folio-mcp",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// HTTP server for MCP transport.
pub struct HttpServer {
    host: String,
    port: u16,
    state: HttpTransportState,
}

impl HttpServer {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        server: Arc<McpServer>,
        resolver: Arc<AuthResolver>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            state: HttpTransportState::new(server, resolver),
        }
    }

    /// Run the HTTP server until ctrl-c.
    pub async fn run(self) -> Result<(), McpError> {
        let app = create_router(self.state);
        let address = format!("{}:{}", self.host, self.port);

        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .map_err(|e| McpError::StartupFailed(format!("Failed to bind to {}: {}", address, e)))?;

        tracing::info!(address = %address, "MCP HTTP server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| McpError::Internal(e.into()))?;

        tracing::info!("MCP HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
