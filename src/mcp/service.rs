//! MCP Service - Core JSON-RPC 2.0 request handler.

use crate::mcp::rpc::{OutboundResponse, RpcRequest};
use crate::mcp::tools::{ToolContext, ToolRegistry};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Core MCP request handler.
#[derive(Clone)]
pub struct McpService {
    registry: Arc<ToolRegistry>,
}

impl McpService {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub async fn handle_request(
        &self,
        request: RpcRequest,
        context: &ToolContext,
    ) -> Option<OutboundResponse> {
        if request.jsonrpc != "2.0" {
            warn!("received unsupported jsonrpc version: {}", request.jsonrpc);
            return Some(OutboundResponse::invalid_request(
                request.id.clone(),
                "Unsupported jsonrpc version (expected 2.0)",
            ));
        }

        let RpcRequest {
            method, params, id, ..
        } = request;

        match method.as_str() {
            "initialize" => Some(self.handle_initialize(id, params)),
            "tools/list" => Some(self.handle_list_tools(id)),
            "tools/call" => Some(self.handle_call_tool(id, params, context).await),
            "ping" => Some(OutboundResponse::success(id, json!({ "ok": true }))),
            method if method.starts_with("notifications/") => {
                info!("received client notification: {}", method);
                None
            }
            other => Some(OutboundResponse::method_not_found(id, other)),
        }
    }

    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> OutboundResponse {
        let parsed: InitializeParams = match parse_params(params) {
            Ok(value) => value,
            Err(message) => return OutboundResponse::invalid_params(id, message),
        };

        info!(
            "client requested initialization: {} v{} (protocol {})",
            parsed.client_info.name,
            parsed
                .client_info
                .version
                .clone()
                .unwrap_or_else(|| "unknown".into()),
            parsed.protocol_version
        );
        if parsed.protocol_version != PROTOCOL_VERSION {
            warn!(
                "client protocol {} differs from server protocol {}, answering with {}",
                parsed.protocol_version, PROTOCOL_VERSION, PROTOCOL_VERSION
            );
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: ImplementationInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Smartfill MCP Server".to_string()),
            },
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
        };

        success(id, &result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> OutboundResponse {
        let tools = self.registry.list_tools();
        let payload = ListToolsResult {
            tools,
            next_cursor: None,
        };

        success(id, &payload)
    }

    async fn handle_call_tool(
        &self,
        id: Option<Value>,
        params: Option<Value>,
        context: &ToolContext,
    ) -> OutboundResponse {
        let parsed: CallToolParams = match parse_params(params) {
            Ok(value) => value,
            Err(message) => return OutboundResponse::invalid_params(id, message),
        };

        info!(
            "tool call '{}' by user {}",
            parsed.name,
            context.claims.user_id()
        );
        let result = self
            .registry
            .call_tool(&parsed.name, parsed.arguments, context)
            .await;
        success(id, &result)
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct InitializeParams {
    #[serde(rename = "protocolVersion")]
    protocol_version: String,
    #[serde(rename = "clientInfo")]
    client_info: ClientInfo,
}

#[derive(Debug, Deserialize)]
struct ClientInfo {
    name: String,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Serialize)]
struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    protocol_version: String,
    #[serde(rename = "serverInfo")]
    server_info: ImplementationInfo,
    capabilities: ServerCapabilities,
}

#[derive(Debug, Serialize)]
struct ImplementationInfo {
    name: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

#[derive(Debug, Serialize)]
struct ServerCapabilities {
    tools: ToolsCapability,
}

#[derive(Debug, Serialize)]
struct ToolsCapability {
    #[serde(rename = "listChanged")]
    list_changed: bool,
}

#[derive(Debug, Serialize)]
struct ListToolsResult {
    tools: Vec<crate::mcp::tools::registry::ToolDescriptor>,
    #[serde(rename = "nextCursor")]
    #[serde(skip_serializing_if = "Option::is_none")]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

fn success<T: Serialize>(id: Option<Value>, payload: &T) -> OutboundResponse {
    match serde_json::to_value(payload) {
        Ok(value) => OutboundResponse::success(id, value),
        Err(err) => OutboundResponse::internal_error(id, format!("Failed to encode result: {err}")),
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, String> {
    match params {
        Some(value) => serde_json::from_value(value).map_err(|err| err.to_string()),
        None => serde_json::from_value(Value::Null).map_err(|err| err.to_string()),
    }
}
