//! Typst rendering engine.
//!
//! Handles the low-level details of writing Typst source to temporary files,
//! invoking the compiler, and managing the output PDF.

use std::fs;
use std::process::Command;

use chrono::Local;
use tempfile::{tempdir, TempDir};

use super::common::{build_typst_source, format_french_date, sanitize_filename};
use super::{DocumentRenderer, RenderError, RenderRequest, RenderedFile};

const SOURCE_FILE: &str = "document.typ";
const OUTPUT_FILE: &str = "document.pdf";

/// Renders final content to PDF through the `typst` CLI.
#[derive(Debug, Clone)]
pub struct TypstRenderEngine {
    typst_bin: String,
}

impl TypstRenderEngine {
    pub fn new(typst_bin: impl Into<String>) -> Self {
        Self {
            typst_bin: typst_bin.into(),
        }
    }

    /// Output filename derived from the document title.
    pub fn output_filename(title: &str) -> String {
        format!("{}.pdf", sanitize_filename(title, "document"))
    }
}

impl Default for TypstRenderEngine {
    fn default() -> Self {
        Self::new("typst")
    }
}

impl DocumentRenderer for TypstRenderEngine {
    fn render_to_file(&self, request: &RenderRequest) -> Result<RenderedFile, RenderError> {
        let date_label = format_french_date(Local::now().date_naive());
        let source = build_typst_source(&request.title, &request.content, &date_label);

        let temp_dir = tempdir().map_err(RenderError::TempDir)?;
        fs::write(temp_dir.path().join(SOURCE_FILE), source).map_err(RenderError::WriteTypst)?;

        let bytes = compile_typst_to_pdf(&self.typst_bin, &temp_dir)?;
        log::info!(
            "Rendered '{}' to PDF ({} bytes, {} values)",
            request.title,
            bytes.len(),
            request.values.len()
        );

        Ok(RenderedFile {
            filename: Self::output_filename(&request.title),
            mime_type: "application/pdf".to_string(),
            bytes,
        })
    }
}

/// Compile a Typst source file to PDF.
fn compile_typst_to_pdf(typst_bin: &str, temp_dir: &TempDir) -> Result<Vec<u8>, RenderError> {
    let typ_path = temp_dir.path().join(SOURCE_FILE);
    let output_path = temp_dir.path().join(OUTPUT_FILE);

    let status = Command::new(typst_bin)
        .arg("compile")
        .arg(&typ_path)
        .arg(&output_path)
        .current_dir(temp_dir.path())
        .status()
        .map_err(RenderError::TypstIo)?;

    if !status.success() {
        let code = status.code().unwrap_or(-1);
        return Err(RenderError::TypstExit(code));
    }

    fs::read(&output_path).map_err(RenderError::ReadPdf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::FormValues;

    #[test]
    fn test_output_filename() {
        assert_eq!(TypstRenderEngine::output_filename("Contrat de bail"), "contrat-de-bail.pdf");
        assert_eq!(TypstRenderEngine::output_filename("???"), "document.pdf");
    }

    #[test]
    fn test_missing_binary_is_an_error() {
        let engine = TypstRenderEngine::new("/nonexistent/typst-binary");
        let result = engine.render_to_file(&RenderRequest {
            title: "Test".into(),
            content: "Bonjour".into(),
            values: FormValues::new(),
        });
        assert!(matches!(result, Err(RenderError::TypstIo(_))));
    }
}
