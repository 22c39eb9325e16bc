use super::ExtractionError;

/// OCR engine abstraction — one page image in, recognized text out.
///
/// Implementations must tolerate empty or failed recognition: an empty
/// `Ok(String)` is a normal result for a blank page. The engine is an
/// external collaborator; tests inject [`MockOcrEngine`].
pub trait OcrEngine: Send + Sync {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// PDF page rasterization abstraction (allows mocking for tests).
pub trait PdfPageRenderer: Send + Sync {
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError>;

    /// Render one page to PNG bytes at the given DPI.
    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page_number: usize,
        dpi: u32,
    ) -> Result<Vec<u8>, ExtractionError>;
}

/// Mock OCR engine returning a scripted result per page, in call order.
/// A `None` entry simulates an engine failure for that page.
pub struct MockOcrEngine {
    pages: Vec<Option<String>>,
    next: std::sync::atomic::AtomicUsize,
}

impl MockOcrEngine {
    /// Same text for every page.
    pub fn fixed(text: &str) -> Self {
        Self {
            pages: vec![Some(text.to_string())],
            next: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// One scripted result per call; `None` fails that call.
    pub fn scripted(pages: Vec<Option<String>>) -> Self {
        Self {
            pages,
            next: std::sync::atomic::AtomicUsize::new(0),
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn ocr_image(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
        let idx = self
            .next
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            .min(self.pages.len().saturating_sub(1));
        match self.pages.get(idx) {
            Some(Some(text)) => Ok(text.clone()),
            Some(None) => Err(ExtractionError::OcrProcessing("scripted failure".into())),
            None => Ok(String::new()),
        }
    }
}

/// Mock renderer returning a minimal valid PNG for each in-range page.
pub struct MockPdfPageRenderer {
    page_count: usize,
}

impl MockPdfPageRenderer {
    pub fn new(page_count: usize) -> Self {
        Self { page_count }
    }
}

impl PdfPageRenderer for MockPdfPageRenderer {
    fn page_count(&self, _pdf_bytes: &[u8]) -> Result<usize, ExtractionError> {
        Ok(self.page_count)
    }

    fn render_page(
        &self,
        _pdf_bytes: &[u8],
        page_number: usize,
        _dpi: u32,
    ) -> Result<Vec<u8>, ExtractionError> {
        if page_number >= self.page_count {
            return Err(ExtractionError::PdfRendering {
                page: page_number,
                reason: format!(
                    "page {page_number} out of range (mock has {} pages)",
                    self.page_count
                ),
            });
        }
        Ok(minimal_png())
    }
}

/// Minimal valid 1x1 white pixel PNG for mock rendering.
pub(crate) fn minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
        0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1
        0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, // 8-bit RGB
        0xDE, // IHDR CRC
        0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, // IDAT chunk
        0x08, 0xD7, 0x63, 0xF8, 0xCF, 0xC0, 0x00, 0x00, // compressed
        0x00, 0x02, 0x00, 0x01, 0xE2, 0x21, 0xBC, 0x33, // IDAT CRC
        0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, // IEND chunk
        0xAE, 0x42, 0x60, 0x82, // IEND CRC
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_ocr_returns_fixed_text() {
        let engine = MockOcrEngine::fixed("Ward round note");
        assert_eq!(engine.ocr_image(b"png").unwrap(), "Ward round note");
        assert_eq!(engine.ocr_image(b"png").unwrap(), "Ward round note");
    }

    #[test]
    fn mock_ocr_scripted_failure() {
        let engine = MockOcrEngine::scripted(vec![Some("page one".into()), None]);
        assert_eq!(engine.ocr_image(b"a").unwrap(), "page one");
        assert!(engine.ocr_image(b"b").is_err());
    }

    #[test]
    fn mock_renderer_bounds() {
        let renderer = MockPdfPageRenderer::new(2);
        assert_eq!(renderer.page_count(&[]).unwrap(), 2);
        assert!(renderer.render_page(&[], 1, 144).is_ok());
        assert!(renderer.render_page(&[], 2, 144).is_err());
    }

    #[test]
    fn minimal_png_has_signature() {
        let png = minimal_png();
        assert_eq!(&png[..4], &[0x89, 0x50, 0x4E, 0x47]);
    }
}
