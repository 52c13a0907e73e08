use tracing::debug;

use super::{DocumentKind, ExtractError};

/// Extracts text page by page, skipping pages that yield nothing (e.g. scanned images).
pub(super) fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| {
        ExtractError::Invalid {
            kind: DocumentKind::Pdf,
            reason: e.to_string(),
        }
    })?;

    let total = pages.len();
    let texts: Vec<&str> = pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect();

    debug!("PDF extraction: {} of {} pages had text", texts.len(), total);
    Ok(texts.join("\n"))
}
