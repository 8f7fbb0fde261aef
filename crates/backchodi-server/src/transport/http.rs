//! HTTP transport: JSON-RPC over `POST /mcp` behind a bearer token

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use backchodi_core::{BattleError, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::BattleServer;
use crate::mcp;

#[derive(Clone)]
struct HttpState {
    server: Arc<BattleServer>,
    auth_token: Arc<str>,
}

/// Build the router; `/health` is open, `/mcp` requires the bearer token
pub fn router(server: Arc<BattleServer>, auth_token: &str) -> Router {
    let state = HttpState {
        server,
        auth_token: Arc::from(auth_token),
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/mcp", post(handle_mcp))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until ctrl-c
pub async fn serve(server: Arc<BattleServer>, addr: SocketAddr, auth_token: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| BattleError::Transport(format!("Failed to bind {}: {}", addr, e)))?;
    info!("Backchodi Battle MCP server listening on http://{}/mcp", addr);

    axum::serve(listener, router(server, auth_token))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .map_err(|e| BattleError::Transport(format!("HTTP server error: {}", e)))
}

async fn health_check() -> &'static str {
    "ok"
}

fn authorized(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token.trim() == expected)
}

async fn handle_mcp(State(state): State<HttpState>, headers: HeaderMap, body: String) -> Response {
    if !authorized(&headers, &state.auth_token) {
        warn!("Rejected MCP request with missing or invalid bearer token");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    debug!("Received: {}", body);

    let request: mcp::Request = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) => {
            warn!("Failed to parse request: {}", e);
            return axum::Json(mcp::Response::parse_error(format!("Parse error: {}", e)))
                .into_response();
        }
    };

    match state.server.handle_request(&request).await {
        Some(response) => axum::Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
