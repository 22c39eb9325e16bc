//! Entry point: one file in, one [`ExtractedDocument`] out.
//!
//! Dispatch is by file extension (case-insensitive); unknown extensions
//! get the plain-text treatment when the bytes look like text. PDFs walk
//! a ladder of strategies: the embedded text layer first, then XFA form
//! data reassembled into a report, then OCR when an engine was injected.
//! Whatever produced the text, the tail of the pipeline is the same:
//! detect the export dialect, segment into notes, pull patient
//! demographics from the full text, and classify note bodies into
//! category excerpts.

use std::path::Path;

use crate::models::ExtractedDocument;
use crate::pipeline::classify;
use crate::pipeline::container::{extract_docx_text, extract_spreadsheet_text};
use crate::pipeline::extraction::{self, OcrEngine, PdfPageRenderer};
use crate::pipeline::fields::patient;
use crate::pipeline::segment::{self, detector};
use crate::pipeline::PipelineError;

pub struct DocumentIngestor {
    ocr_engine: Option<Box<dyn OcrEngine>>,
    pdf_renderer: Option<Box<dyn PdfPageRenderer>>,
}

impl DocumentIngestor {
    /// An ingestor without OCR; scanned PDFs with no text layer or form
    /// data will fail with [`PipelineError::FailedToRead`].
    pub fn new() -> Self {
        Self {
            ocr_engine: None,
            pdf_renderer: None,
        }
    }

    pub fn with_ocr(
        engine: Box<dyn OcrEngine>,
        renderer: Box<dyn PdfPageRenderer>,
    ) -> Self {
        Self {
            ocr_engine: Some(engine),
            pdf_renderer: Some(renderer),
        }
    }

    pub fn ingest_path(&self, path: &Path) -> Result<ExtractedDocument, PipelineError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        let bytes = std::fs::read(path)?;
        tracing::info!(path = %path.display(), size = bytes.len(), "ingesting document");
        self.ingest_bytes(&bytes, &extension)
    }

    pub fn ingest_bytes(
        &self,
        bytes: &[u8],
        extension: &str,
    ) -> Result<ExtractedDocument, PipelineError> {
        let full_text = match extension.to_lowercase().as_str() {
            "xlsx" | "xlsm" | "xls" => extract_spreadsheet_text(bytes)?,
            "docx" | "doc" => extract_docx_text(bytes)?,
            "pdf" => self.extract_pdf_text(bytes)?,
            // An explicit .txt is trusted; stray non-UTF-8 bytes are
            // replaced rather than rejected.
            "txt" => String::from_utf8_lossy(bytes).into_owned(),
            other => {
                let Some(text) = decode_plain_text(bytes) else {
                    return Err(PipelineError::UnsupportedFormat(if other.is_empty() {
                        "(no extension)".to_string()
                    } else {
                        other.to_string()
                    }));
                };
                text
            }
        };

        self.normalize(full_text)
    }

    /// PDF strategy ladder: text layer, then XFA form data, then OCR.
    fn extract_pdf_text(&self, bytes: &[u8]) -> Result<String, PipelineError> {
        match extraction::pdf::extract_text_layer(bytes) {
            Ok(text) if !extraction::pdf::is_placeholder_text(&text) => {
                tracing::debug!(chars = text.len(), "PDF text layer used");
                return Ok(text);
            }
            Ok(_) => tracing::debug!("PDF text layer is a placeholder shell"),
            Err(e) => tracing::debug!(error = %e, "PDF text layer unavailable"),
        }

        if let Some(xml) = extraction::xfa::extract_xfa_text(bytes) {
            let fields = extraction::xfa::parse_field_map(&xml);
            let report = extraction::form_report::assemble_report(&fields);
            if !report.trim().is_empty() {
                tracing::debug!(fields = fields.len(), "XFA form data used");
                return Ok(report);
            }
        }

        if let (Some(engine), Some(renderer)) = (&self.ocr_engine, &self.pdf_renderer) {
            let text = extraction::ocr::ocr_pdf_pages(bytes, renderer.as_ref(), engine.as_ref());
            if !text.trim().is_empty() {
                tracing::debug!(chars = text.len(), "OCR fallback used");
                return Ok(text);
            }
        }

        Err(PipelineError::FailedToRead(
            "no text layer, form data or OCR output".to_string(),
        ))
    }

    /// Common tail: segmentation, patient extraction, classification.
    fn normalize(&self, full_text: String) -> Result<ExtractedDocument, PipelineError> {
        let lines: Vec<String> = full_text.lines().map(|l| l.to_string()).collect();
        if lines.iter().all(|l| l.trim().is_empty()) {
            return Err(PipelineError::NoContent);
        }

        let dialect = detector::detect_dialect(&lines);
        let notes = segment::segment_lines(&lines, dialect);
        let patient = patient::extract_patient_info(&full_text);
        let categories = classify::categorize_notes(&notes);

        tracing::info!(
            dialect = dialect.as_str(),
            notes = notes.len(),
            categories = categories.len(),
            "document normalized"
        );

        Ok(ExtractedDocument {
            full_text,
            notes,
            patient,
            categories,
        })
    }
}

impl Default for DocumentIngestor {
    fn default() -> Self {
        Self::new()
    }
}

/// Accept bytes as plain text when they are valid UTF-8 and at least 80%
/// printable (control characters other than whitespace count against).
fn decode_plain_text(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return Some(String::new());
    }
    let text = std::str::from_utf8(bytes).ok()?;
    let printable = text
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .count();
    let ratio = printable as f64 / text.chars().count().max(1) as f64;
    (ratio >= 0.8).then(|| text.to_string())
}
