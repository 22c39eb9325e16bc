//! PDF text-layer extraction using the pdf-extract crate.
//!
//! First rung of the PDF ladder: digital PDFs with an embedded text
//! layer give their text up directly. Structured-form PDFs render only a
//! viewer placeholder here and fall through to the form-data walk.

use super::ExtractionError;
use crate::config;

/// Known placeholder shown by XFA-form PDFs in viewers that cannot
/// render them.
const XFA_PLACEHOLDER_MARKER: &str = "Please wait";

/// Extract the embedded text layer from the first pages of a PDF.
pub fn extract_text_layer(pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;

    let page_count = pages.len();
    let text = pages
        .into_iter()
        .take(config::MAX_TEXT_PAGES)
        .collect::<Vec<_>>()
        .join("\n");

    tracing::debug!(
        pages = page_count,
        chars = text.len(),
        "PDF text layer extracted"
    );
    Ok(text)
}

/// Whether extracted text is materially empty: under the minimum count
/// of non-whitespace characters, or the known "please wait" placeholder
/// page an XFA form shows to viewers that cannot display it.
pub fn is_placeholder_text(text: &str) -> bool {
    if text.contains(XFA_PLACEHOLDER_MARKER) {
        return true;
    }
    let non_whitespace = text.chars().filter(|c| !c.is_whitespace()).count();
    non_whitespace < config::PLACEHOLDER_MIN_CHARS
}
