//! Core content types for MCP tool responses.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Metadata for file content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    /// Filename with extension
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: usize,
    /// ISO8601
    pub created_at: String,
}

impl FileMetadata {
    pub fn new(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: usize,
    ) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            size_bytes,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Content item in tool result (MCP spec compatible).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Base64-encoded data (for resource type)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FileMetadata>,
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_string(),
            text: Some(text.into()),
            data: None,
            mime_type: None,
            metadata: None,
        }
    }

    /// Embedded file, base64-encoded.
    pub fn resource(data: &[u8], mime_type: &str, filename: &str) -> Self {
        Self {
            content_type: "resource".to_string(),
            text: Some(format!("Fichier généré : {}", filename)),
            data: Some(BASE64.encode(data)),
            mime_type: Some(mime_type.to_string()),
            metadata: Some(FileMetadata::new(filename, mime_type, data.len())),
        }
    }

    pub fn decode_data(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.data.as_ref().map(|data| BASE64.decode(data))
    }
}

/// Result of a tool call (MCP spec compatible).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(content: Vec<ContentItem>) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(message)],
            is_error: true,
        }
    }
}
