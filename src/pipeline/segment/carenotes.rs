//! CareNotes export segmentation.
//!
//! CareNotes entries open with a bare date line (optionally followed by a
//! bare time line) and sign off at the bottom, either with the system's
//! "Name, , date" double-comma stamp or a plain "-- Name" line. The
//! signature is stripped from the body on close.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::config;
use crate::models::{ClinicalNote, SourceDialect};
use crate::pipeline::fields::{dates, note_type};

use super::Segmenter;

/// "J Smith, , 01/02/2023" style system stamp.
pub(crate) static RE_SIG_DOUBLE_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z][A-Za-z .'-]{1,60}),\s*,\s*(\S.*)$").expect("valid regex"));

/// Hand-typed "-- J Smith" sign-off.
pub(crate) static RE_SIG_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-{2,10}\s*([A-Za-z][A-Za-z .'-]{1,60})\s*$").expect("valid regex"));

pub struct CareNotesSegmenter {
    timestamp: Option<NaiveDateTime>,
    body: Vec<String>,
    /// Set between the date marker and the first body line; a lone time
    /// line in that gap refines the note timestamp.
    awaiting_time: bool,
}

impl CareNotesSegmenter {
    pub fn new() -> Self {
        Self {
            timestamp: None,
            body: Vec::new(),
            awaiting_time: false,
        }
    }

    fn close(&mut self) -> Option<ClinicalNote> {
        let timestamp = self.timestamp.take();
        let mut body = std::mem::take(&mut self.body);
        self.awaiting_time = false;

        let (author, sig_date) = strip_signature(&mut body);
        if body.iter().all(|l| l.trim().is_empty()) {
            return None;
        }

        let timestamp = timestamp.or_else(|| sig_date.as_deref().and_then(dates::parse_flexible_date));
        let note_type = body.first().map(|l| note_type::infer_from_first_line(l));

        Some(ClinicalNote::new(
            timestamp,
            note_type,
            author.unwrap_or_default(),
            body.join("\n"),
            SourceDialect::CareNotes,
        ))
    }
}

impl Default for CareNotesSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan the last few body lines backward for a signature; on a hit,
/// truncate the body there and return the author (and the stamp's date
/// text, when the double-comma form carried one).
fn strip_signature(body: &mut Vec<String>) -> (Option<String>, Option<String>) {
    let start = body.len().saturating_sub(config::SIGNATURE_SCAN_LINES);
    for idx in (start..body.len()).rev() {
        if let Some(caps) = RE_SIG_DOUBLE_COMMA.captures(&body[idx]) {
            let author = caps[1].trim().to_string();
            let sig_date = caps[2].trim().to_string();
            body.truncate(idx);
            return (Some(author), Some(sig_date));
        }
        if let Some(caps) = RE_SIG_DASH.captures(&body[idx]) {
            let author = caps[1].trim().to_string();
            body.truncate(idx);
            return (Some(author), None);
        }
    }
    (None, None)
}

impl Segmenter for CareNotesSegmenter {
    fn push_line(&mut self, line: &str) -> Option<ClinicalNote> {
        let trimmed = line.trim();

        if let Some(dt) = dates::match_date_line(trimmed) {
            let closed = self.close();
            self.timestamp = Some(dt);
            self.awaiting_time = true;
            return closed;
        }

        if trimmed.is_empty() {
            return None;
        }

        if self.awaiting_time {
            if let Some(time) = dates::match_time_line(trimmed) {
                if let Some(ts) = self.timestamp {
                    self.timestamp = Some(NaiveDateTime::new(ts.date(), time));
                }
                self.awaiting_time = false;
                return None;
            }
            self.awaiting_time = false;
        }

        self.body.push(trimmed.to_string());
        None
    }

    fn finish(&mut self) -> Option<ClinicalNote> {
        self.close()
    }
}
