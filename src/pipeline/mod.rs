//! Clinical document ingestion pipeline.
//!
//! Raw bytes flow one way: container/PDF extraction produces plain text
//! lines, dialect detection picks a segmenter, segmentation yields notes,
//! and field extraction plus classification fill in the rest of the
//! [`ExtractedDocument`](crate::models::ExtractedDocument).

pub mod classify;
pub mod container;
pub mod extraction;
pub mod fields;
pub mod ingest;
pub mod segment;

pub use ingest::DocumentIngestor;

use thiserror::Error;

use container::ContainerError;
use extraction::ExtractionError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to read document: {0}")]
    FailedToRead(String),

    #[error("document contains no extractable text")]
    NoContent,
}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        Self::FailedToRead(e.to_string())
    }
}

impl From<ContainerError> for PipelineError {
    fn from(e: ContainerError) -> Self {
        Self::FailedToRead(e.to_string())
    }
}

impl From<ExtractionError> for PipelineError {
    fn from(e: ExtractionError) -> Self {
        Self::FailedToRead(e.to_string())
    }
}
