pub mod docx;
pub mod xlsx;
pub mod xml;
pub mod zip;

pub use docx::extract_docx_text;
pub use xlsx::extract_spreadsheet_text;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("entry not found in archive: {0}")]
    EntryNotFound(String),

    #[error("archive truncated at offset {0}")]
    Truncated(usize),

    #[error("unsupported compression method {0}")]
    UnsupportedCompression(u16),

    #[error("inflate failed: {0}")]
    Inflate(String),

    #[error("entry is not valid UTF-8 text")]
    Encoding,
}
