//! # backchodi-server
//!
//! MCP server for Backchodi Battle.
//!
//! This crate provides:
//! - `ContentGenerator` trait for plugging in a model backend
//! - Game session engine and per-caller session store
//! - MCP JSON-RPC protocol handling
//! - Tool implementations (start_backchodi_battle, send_backchodi, etc.)
//! - stdio and HTTP transports

pub mod content;
pub mod engine;
pub mod mcp;
pub mod render;
pub mod store;
pub mod tools;
pub mod transport;

pub use content::{ContentGenerator, FallbackContent, PrimaryFactory, ResilientContent};
pub use engine::{BattleEngine, EngineConfig};
pub use store::SessionStore;

use backchodi_core::error_codes;
use tracing::debug;

use crate::mcp::{
    DEFAULT_PROTOCOL_VERSION, InitializeParams, InitializeResult, Request, Response,
    ServerCapabilities, ServerInfo, ToolsCapability,
};
use crate::tools::{handle_tool_call, list_tools};

/// Backchodi Battle MCP server
pub struct BattleServer {
    engine: BattleEngine,
    /// Identifier returned by the `validate` tool
    owner_id: String,
}

impl BattleServer {
    pub fn new(engine: BattleEngine, owner_id: impl Into<String>) -> Self {
        Self {
            engine,
            owner_id: owner_id.into(),
        }
    }

    pub fn engine(&self) -> &BattleEngine {
        &self.engine
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Dispatch one JSON-RPC message
    ///
    /// Returns `None` for notifications.
    pub async fn handle_request(&self, request: &Request) -> Option<Response> {
        if request.is_notification() {
            debug!("Notification: {}", request.method);
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => Response::success(request.id.clone(), serde_json::json!({})),
            "tools/list" => {
                Response::success(request.id.clone(), serde_json::json!({ "tools": list_tools() }))
            }
            "tools/call" => self.handle_tools_call(request).await,
            _ => Response::error(
                request.id.clone(),
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, request: &Request) -> Response {
        let params: InitializeParams = if request.params.is_null() {
            InitializeParams::default()
        } else {
            match serde_json::from_value(request.params.clone()) {
                Ok(p) => p,
                Err(e) => {
                    return Response::error(
                        request.id.clone(),
                        error_codes::INVALID_PARAMS,
                        format!("Invalid initialize params: {}", e),
                    );
                }
            }
        };

        if let Some(client) = &params.client_info {
            debug!("Client: {} {}", client.name, client.version);
        }

        let result = InitializeResult {
            protocol_version: params
                .protocol_version
                .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string()),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: "Backchodi Battle MCP Server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(value) => Response::success(request.id.clone(), value),
            Err(e) => Response::error(
                request.id.clone(),
                error_codes::INTERNAL_ERROR,
                e.to_string(),
            ),
        }
    }

    async fn handle_tools_call(&self, request: &Request) -> Response {
        #[derive(serde::Deserialize)]
        struct ToolCallParams {
            name: String,
            #[serde(default)]
            arguments: serde_json::Value,
        }

        let params: ToolCallParams = match serde_json::from_value(request.params.clone()) {
            Ok(p) => p,
            Err(e) => {
                return Response::error(
                    request.id.clone(),
                    error_codes::INVALID_PARAMS,
                    format!("Invalid tool call params: {}", e),
                );
            }
        };

        handle_tool_call(&params.name, params.arguments, request.id.clone(), self).await
    }
}
