//! OCR fallback for PDFs with no machine-readable text.
//!
//! Pages are rasterized one at a time and handed to the injected OCR
//! engine. Page rendering and recognition are pure functions of one page,
//! so a single page's failure degrades to an empty string for that page
//! and never aborts the rest of the document.

use super::types::{OcrEngine, PdfPageRenderer};
use crate::config;

/// OCR up to the page cap, joining each page's recognized lines with
/// newlines and separating pages with a blank line.
pub fn ocr_pdf_pages(
    pdf_bytes: &[u8],
    renderer: &dyn PdfPageRenderer,
    engine: &dyn OcrEngine,
) -> String {
    let total = match renderer.page_count(pdf_bytes) {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(error = %e, "could not count PDF pages for OCR");
            return String::new();
        }
    };
    let page_count = total.min(config::MAX_OCR_PAGES);
    if total > page_count {
        tracing::debug!(total, capped = page_count, "OCR page cap applied");
    }

    let mut pages = Vec::with_capacity(page_count);
    for page in 0..page_count {
        let text = renderer
            .render_page(pdf_bytes, page, config::OCR_RENDER_DPI)
            .and_then(|png| engine.ocr_image(&png))
            .unwrap_or_else(|e| {
                tracing::warn!(page = page + 1, error = %e, "OCR failed for page");
                String::new()
            });
        let joined = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        pages.push(joined);
    }

    pages.join("\n\n")
}
