//! MCP Tools module - defines tools exposed via JSON-RPC.
//!
//! Each tool provides:
//! - Tool descriptor (name, description, input schema)
//! - Argument parsing and validation
//!
//! Execution lives in the registry, which has access to the application state.

mod describe_template;
mod generate_document;
mod preview_document;
pub mod registry;

pub use registry::{ToolContext, ToolRegistry};

use uuid::Uuid;

fn parse_template_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| format!("Identifiant de modèle invalide : '{}'", raw))
}
