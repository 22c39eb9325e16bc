//! Word-processor (.docx) text extraction.
//!
//! Pulls `word/document.xml` out of the container and flattens it to one
//! text line per paragraph.

use std::sync::LazyLock;

use regex::Regex;

use super::xml::decode_entities;
use super::{zip, ContainerError};

const DOCUMENT_PART: &str = "word/document.xml";

static RE_WT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<w:t[^>]*>(.*?)</w:t>").expect("valid regex"));
static RE_TAB: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<w:tab\s*/>").expect("valid regex"));
static RE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<w:br\s*/>").expect("valid regex"));

/// Extract paragraph text from a .docx container, one paragraph per line.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ContainerError> {
    let xml = zip::extract_entry(bytes, DOCUMENT_PART)?;

    let mut lines = Vec::new();
    for paragraph in xml.split("</w:p>") {
        let with_tabs = RE_TAB.replace_all(paragraph, "\t");
        let with_breaks = RE_BREAK.replace_all(&with_tabs, "\n");
        let text: String = RE_WT
            .captures_iter(&with_breaks)
            .map(|c| decode_entities(&c[1]))
            .collect();
        let text = text.trim();
        if !text.is_empty() {
            lines.push(text.to_string());
        }
    }

    tracing::debug!(paragraphs = lines.len(), "docx text extracted");
    Ok(lines.join("\n"))
}
