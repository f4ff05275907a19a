//! Tool registry - central routing for MCP tools.
//!
//! Provides `list_tools()` and `call_tool()` per MCP spec.

use actix_web::web;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::Claims;
use crate::db::AppState;
use crate::documents::handlers::generate_document as render_final_document;
use crate::error::ApiError;
use crate::mcp::content::{ContentItem, ToolResult};
use crate::templates::handlers::describe;
use crate::templates::load_template;
use crate::templates::model::PreviewResponse;

use super::describe_template::{self, DescribeTemplateRequest};
use super::generate_document::{self, GenerateDocumentRequest};
use super::preview_document::{self, PreviewDocumentRequest};

/// Tool descriptor conforming to MCP specification.
#[derive(Debug, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Caller of a tool: shared state plus the authenticated user.
pub struct ToolContext {
    pub state: web::Data<AppState>,
    pub claims: Claims,
}

/// Central registry for all MCP tools.
#[derive(Default)]
pub struct ToolRegistry;

impl ToolRegistry {
    pub fn new() -> Self {
        Self
    }

    /// List all available tools per MCP spec.
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        vec![
            describe_template::descriptor(),
            preview_document::descriptor(),
            generate_document::descriptor(),
        ]
    }

    /// Call a tool by name with the given arguments.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<Value>,
        context: &ToolContext,
    ) -> ToolResult {
        match name {
            describe_template::TOOL_NAME => self.call_describe_template(arguments, context).await,
            preview_document::TOOL_NAME => self.call_preview_document(arguments, context).await,
            generate_document::TOOL_NAME => self.call_generate_document(arguments, context).await,
            _ => ToolResult::error(format!(
                "Outil '{}' indisponible. Outils disponibles : {}, {}, {}",
                name,
                describe_template::TOOL_NAME,
                preview_document::TOOL_NAME,
                generate_document::TOOL_NAME,
            )),
        }
    }

    async fn call_describe_template(
        &self,
        arguments: Option<Value>,
        context: &ToolContext,
    ) -> ToolResult {
        let request = match parse_arguments::<DescribeTemplateRequest>(arguments) {
            Ok(req) => req,
            Err(err) => return ToolResult::error(err),
        };
        let template_id = match request.validate() {
            Ok(id) => id,
            Err(err) => return ToolResult::error(err),
        };

        let template = match load_template(&context.state, template_id).await {
            Ok(template) => template,
            Err(err) => return api_error(err),
        };

        match describe(&template, request.mode()) {
            Ok(response) => json_result(&response),
            Err(err) => api_error(err),
        }
    }

    async fn call_preview_document(
        &self,
        arguments: Option<Value>,
        context: &ToolContext,
    ) -> ToolResult {
        let request = match parse_arguments::<PreviewDocumentRequest>(arguments) {
            Ok(req) => req,
            Err(err) => return ToolResult::error(err),
        };
        let template_id = match request.validate() {
            Ok(id) => id,
            Err(err) => return ToolResult::error(err),
        };

        let template = match load_template(&context.state, template_id).await {
            Ok(template) => template,
            Err(err) => return api_error(err),
        };

        let rendered = template.compile().render(&request.values, request.mode);
        json_result(&PreviewResponse::new(template.id, request.mode, rendered))
    }

    async fn call_generate_document(
        &self,
        arguments: Option<Value>,
        context: &ToolContext,
    ) -> ToolResult {
        let request = match parse_arguments::<GenerateDocumentRequest>(arguments) {
            Ok(req) => req,
            Err(err) => return ToolResult::error(err),
        };
        let template_id = match request.validate() {
            Ok(id) => id,
            Err(err) => return ToolResult::error(err),
        };

        let template = match load_template(&context.state, template_id).await {
            Ok(template) => template,
            Err(err) => return api_error(err),
        };

        match render_final_document(&context.state, &context.claims, &template, request.values)
            .await
        {
            Ok(file) => {
                let text = format!(
                    "« {} » généré.\nFichier : {}",
                    template.name, file.filename
                );
                ToolResult::success(vec![
                    ContentItem::text(text),
                    ContentItem::resource(&file.bytes, &file.mime_type, &file.filename),
                ])
            }
            Err(err) => api_error(err),
        }
    }
}

fn parse_arguments<T: for<'de> Deserialize<'de>>(arguments: Option<Value>) -> Result<T, String> {
    let value = arguments.unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|err| format!("Arguments invalides : {}", err))
}

fn json_result<T: Serialize>(payload: &T) -> ToolResult {
    let json_text = serde_json::to_string_pretty(payload).unwrap_or_else(|_| "{}".to_string());
    ToolResult::success(vec![ContentItem::text(json_text)])
}

fn api_error(err: ApiError) -> ToolResult {
    match err {
        ApiError::Validation(errors) => ToolResult::error(errors.to_message()),
        ApiError::Store(e) => {
            log::error!("Store error during MCP tool call: {}", e);
            ToolResult::error("Erreur de stockage")
        }
        ApiError::Render(e) => {
            log::error!("Render error during MCP tool call: {}", e);
            ToolResult::error("La génération du document a échoué")
        }
        other => ToolResult::error(other.to_string()),
    }
}
