//! MCP (Model Context Protocol) Module
//!
//! JSON-RPC 2.0 over HTTP exposing the template engine to AI agents.
//! Every call runs on behalf of the bearer token's user.

pub mod content;
pub mod handlers;
pub mod rpc;
pub mod service;
pub mod tools;

pub use handlers::{config, McpState};
pub use service::McpService;
