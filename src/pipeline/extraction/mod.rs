pub mod form_report;
pub mod ocr;
pub mod pdf;
pub mod renderer;
pub mod types;
pub mod xfa;

pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("PDF page {page} rendering failed: {reason}")]
    PdfRendering { page: usize, reason: String },

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),

    #[error("no extractable form data")]
    NoFormData,
}
