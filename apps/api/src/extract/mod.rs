//! Document Extractor — turns an uploaded PDF or DOCX payload into plain text.
//!
//! Parsing itself is delegated to `pdf-extract` (PDF) and `zip` + `quick-xml` (DOCX).
//! Both are CPU-bound; async callers must run `extract` inside `spawn_blocking`.

mod docx;
mod pdf;

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported document type: {0}")]
    UnsupportedFormat(String),

    #[error("invalid {kind} document: {reason}")]
    Invalid { kind: DocumentKind, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Resolves the kind from an upload's file name by extension (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Result<Self, ExtractError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("pdf") => Ok(DocumentKind::Pdf),
            Some("docx") => Ok(DocumentKind::Docx),
            _ => Err(ExtractError::UnsupportedFormat(file_name.to_string())),
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Pdf => f.write_str("PDF"),
            DocumentKind::Docx => f.write_str("DOCX"),
        }
    }
}

/// Extracts plain text from `bytes` interpreted as a document of `kind`.
///
/// PDF pages and DOCX paragraphs are joined with `\n` in document order.
/// PDF pages without extractable text are skipped, not reported.
pub fn extract(bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::Pdf => pdf::extract_pdf_text(bytes),
        DocumentKind::Docx => docx::extract_docx_text(bytes),
    }
}
