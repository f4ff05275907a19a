//! Rendering collaborator - turns final-mode content into a downloadable file.

pub mod common;
pub mod engine;

pub use engine::TypstRenderEngine;

use thiserror::Error;

use crate::template::FormValues;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
}

/// Input of a render. `content` is already substituted in final mode.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub title: String,
    pub content: String,
    pub values: FormValues,
}

#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Renderers are blocking; callers run them off the async executor.
pub trait DocumentRenderer {
    fn render_to_file(&self, request: &RenderRequest) -> Result<RenderedFile, RenderError>;
}
