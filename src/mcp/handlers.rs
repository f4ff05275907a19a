//! MCP stateless HTTP handlers for Actix-Web.
//!
//! Each request is independent: the bearer token is checked on every call
//! and no SSE connection is kept open.

use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::db::AppState;
use crate::error::ApiError;
use crate::mcp::rpc::RpcRequest;
use crate::mcp::service::McpService;
use crate::mcp::tools::ToolContext;
use crate::templates::handlers::require_user;

pub struct McpState {
    pub service: McpService,
}

impl McpState {
    pub fn new(service: McpService) -> Self {
        Self { service }
    }
}

/// RPC handler - POST /mcp
pub async fn rpc_handler(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    state: web::Data<Arc<McpState>>,
    body: web::Json<RpcRequest>,
) -> Result<HttpResponse, ApiError> {
    let claims = require_user(&req, &app_state)?;
    log::info!("Received MCP request: {}", body.method);

    let context = ToolContext {
        state: app_state,
        claims,
    };

    if let Some(response) = state.service.handle_request(body.into_inner(), &context).await {
        return Ok(HttpResponse::Ok()
            .content_type("application/json")
            .json(response));
    }

    // Notifications return 202 Accepted
    Ok(HttpResponse::Accepted().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/mcp").route(web::post().to(rpc_handler)));
}
