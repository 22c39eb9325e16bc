//! Wardflow turns hospital clinical-record exports into structured data.
//!
//! Trusts export one patient's record as a spreadsheet, PDF, word
//! processor file or plain text, each record system with its own layout.
//! Wardflow ingests one such file and returns the extracted text, the
//! individual clinical notes with their dates, authors and types, the
//! patient's demographics, and topic-categorized excerpts.
//!
//! ```no_run
//! use std::path::Path;
//! use wardflow::pipeline::DocumentIngestor;
//!
//! # fn main() -> Result<(), wardflow::pipeline::PipelineError> {
//! let doc = DocumentIngestor::new().ingest_path(Path::new("export.pdf"))?;
//! for note in &doc.notes {
//!     println!("{} {} {}", note.display_date(), note.note_type, note.author);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod models;
pub mod pipeline;

pub use models::{
    ClinicalCategory, ClinicalNote, ExtractedDocument, Gender, PatientInfo, SourceDialect,
};
pub use pipeline::{DocumentIngestor, PipelineError};

/// Ingest a file with the default (no OCR) ingestor.
pub fn ingest_file(path: &std::path::Path) -> Result<ExtractedDocument, PipelineError> {
    DocumentIngestor::new().ingest_path(path)
}
