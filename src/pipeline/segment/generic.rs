//! Fallback segmentation for imports with no recognized layout.
//!
//! Bare date lines delimit notes; a date buried in prose seeds the
//! timestamp of a note that has not accumulated body yet, while the
//! line itself stays in the body. Author and type are never inferred.

use chrono::NaiveDateTime;

use crate::models::{ClinicalNote, SourceDialect};
use crate::pipeline::fields::dates;

use super::Segmenter;

pub struct GenericSegmenter {
    timestamp: Option<NaiveDateTime>,
    body: Vec<String>,
}

impl GenericSegmenter {
    pub fn new() -> Self {
        Self {
            timestamp: None,
            body: Vec::new(),
        }
    }

    fn close(&mut self) -> Option<ClinicalNote> {
        let timestamp = self.timestamp.take();
        let body = std::mem::take(&mut self.body);
        if body.iter().all(|l| l.trim().is_empty()) {
            return None;
        }
        Some(ClinicalNote::new(
            timestamp,
            None,
            String::new(),
            body.join("\n"),
            SourceDialect::Imported,
        ))
    }
}

impl Default for GenericSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for GenericSegmenter {
    fn push_line(&mut self, line: &str) -> Option<ClinicalNote> {
        let trimmed = line.trim();

        if let Some(dt) = dates::match_date_line(trimmed) {
            let closed = self.close();
            self.timestamp = Some(dt);
            return closed;
        }

        if trimmed.is_empty() {
            return None;
        }

        if self.body.is_empty() && self.timestamp.is_none() {
            self.timestamp = dates::parse_flexible_date(trimmed);
        }
        self.body.push(trimmed.to_string());
        None
    }

    fn finish(&mut self) -> Option<ClinicalNote> {
        self.close()
    }
}
