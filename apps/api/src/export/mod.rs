//! Report Exporter — renders arbitrary text as a paginated, ASCII-only PDF in memory.
//!
//! Pipeline: `to_ascii` → `layout_text` → `render_pdf`. Nothing touches disk.
//! Rendering is CPU-bound; async callers run `export` inside `spawn_blocking`.

pub mod ascii;
pub mod font_metrics;
pub mod layout;
mod pdf;

use thiserror::Error;
use tracing::debug;

use self::ascii::to_ascii;
use self::font_metrics::{default_page_config, HELVETICA};
use self::layout::layout_text;

pub const PDF_MIME: &str = "application/pdf";
pub const ANALYSIS_FILE_NAME: &str = "resume_feedback.pdf";
pub const GENERATED_FILE_NAME: &str = "generated_resume.pdf";

const DOCUMENT_TITLE: &str = "Resume Assistant";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF rendering failed: {0}")]
    Render(String),
}

/// A rendered file ready to hand to the user. Created on demand, never cached.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub file_name: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportedDocument {
    pub fn mime(&self) -> &'static str {
        PDF_MIME
    }
}

/// Renders `text` to PDF bytes. Non-ASCII characters are decomposed or dropped.
pub fn export(text: &str) -> Result<Vec<u8>, ExportError> {
    let ascii = to_ascii(text);
    let config = default_page_config();
    let pages = layout_text(&ascii, &config, &HELVETICA);
    let bytes = pdf::render_pdf(DOCUMENT_TITLE, &pages, &config)?;

    debug!(
        "Exported {} chars to {} page(s), {} bytes",
        ascii.len(),
        pages.len(),
        bytes.len()
    );
    Ok(bytes)
}
