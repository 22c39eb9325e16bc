//! PDF page rasterization via Google PDFium.
//!
//! `PdfiumRenderer` is stateless (`Send + Sync`). Each call loads a
//! fresh `Pdfium` handle because the upstream type is `!Send`; the OS
//! caches the underlying dlopen/LoadLibrary call, so repeat loads are
//! near-free.

use std::io::Cursor;

use image::ImageOutputFormat;
use pdfium_render::prelude::*;

use super::types::PdfPageRenderer;
use super::ExtractionError;

/// Guard against OOM on absurd page sizes or DPI settings.
const MAX_DIMENSION_PX: u32 = 4096;

/// PDF points per inch (standard PDF unit).
const POINTS_PER_INCH: f32 = 72.0;

pub struct PdfiumRenderer;

impl PdfiumRenderer {
    /// Create a renderer, verifying the PDFium library is loadable.
    pub fn new() -> Result<Self, ExtractionError> {
        let _ = load_pdfium()?;
        Ok(Self)
    }
}

/// Load the PDFium dynamic library: `PDFIUM_DYNAMIC_LIB_PATH` env var
/// first, then the system library search paths.
fn load_pdfium() -> Result<Pdfium, ExtractionError> {
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        let bindings = Pdfium::bind_to_library(&path).map_err(|e| {
            ExtractionError::PdfRendering {
                page: 0,
                reason: format!("failed to load PDFium from {path}: {e}"),
            }
        })?;
        return Ok(Pdfium::new(bindings));
    }

    let bindings = Pdfium::bind_to_system_library().map_err(|e| {
        ExtractionError::PdfRendering {
            page: 0,
            reason: format!(
                "PDFium library not found. Set PDFIUM_DYNAMIC_LIB_PATH or install PDFium: {e}"
            ),
        }
    })?;
    Ok(Pdfium::new(bindings))
}

/// Pixel dimensions for a page at the given DPI, aspect-preserving and
/// clamped to [1, MAX_DIMENSION_PX].
fn compute_render_dimensions(width_points: f32, height_points: f32, dpi: u32) -> (u32, u32) {
    let scale = dpi as f32 / POINTS_PER_INCH;
    let raw_w = (width_points * scale).max(1.0);
    let raw_h = (height_points * scale).max(1.0);

    let max_dim = raw_w.max(raw_h);
    if max_dim > MAX_DIMENSION_PX as f32 {
        let ratio = MAX_DIMENSION_PX as f32 / max_dim;
        let w = ((raw_w * ratio) as u32).clamp(1, MAX_DIMENSION_PX);
        let h = ((raw_h * ratio) as u32).clamp(1, MAX_DIMENSION_PX);
        (w, h)
    } else {
        (raw_w as u32, raw_h as u32)
    }
}

impl PdfPageRenderer for PdfiumRenderer {
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError> {
        let pdfium = load_pdfium()?;
        let document = pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(|e| ExtractionError::PdfRendering {
                page: 0,
                reason: format!("failed to load PDF: {e}"),
            })?;
        Ok(document.pages().len() as usize)
    }

    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page_number: usize,
        dpi: u32,
    ) -> Result<Vec<u8>, ExtractionError> {
        let pdfium = load_pdfium()?;
        let document = pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(|e| ExtractionError::PdfRendering {
                page: page_number,
                reason: format!("failed to load PDF: {e}"),
            })?;

        let pages = document.pages();
        let page_index =
            u16::try_from(page_number).map_err(|_| ExtractionError::PdfRendering {
                page: page_number,
                reason: format!("page index {page_number} exceeds u16 maximum"),
            })?;
        let page = pages
            .get(page_index)
            .map_err(|_| ExtractionError::PdfRendering {
                page: page_number,
                reason: format!(
                    "page {page_number} out of range (document has {} pages)",
                    pages.len()
                ),
            })?;

        let (target_w, target_h) =
            compute_render_dimensions(page.width().value, page.height().value, dpi);

        let render_config = PdfRenderConfig::new()
            .set_target_width(target_w as i32)
            .set_maximum_height(target_h as i32);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| ExtractionError::PdfRendering {
                page: page_number,
                reason: format!("rendering failed: {e}"),
            })?;

        let mut cursor = Cursor::new(Vec::new());
        bitmap
            .as_image()
            .write_to(&mut cursor, ImageOutputFormat::Png)
            .map_err(|e| ExtractionError::ImageProcessing(format!("PNG encoding failed: {e}")))?;

        let png_bytes = cursor.into_inner();
        tracing::debug!(
            page = page_number,
            width = target_w,
            height = target_h,
            png_size = png_bytes.len(),
            "rendered PDF page"
        );
        Ok(png_bytes)
    }
}
