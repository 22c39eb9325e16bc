//! EPJS export segmentation.
//!
//! EPJS entries carry their metadata in two shapes: an inline
//! "1 Feb 2023 09:30" header line opening an entry, or a long dashed
//! rule closing one ("-------------------- 01/02/2023, 09:30, , J
//! Smith"). The dashed form signs the note it trails, so its captured
//! date, time and author are applied to the note being closed. A
//! "Confirmed By <Name>," line anywhere in the body wins over both.

use std::sync::LazyLock;

use chrono::{NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::models::{ClinicalNote, SourceDialect};
use crate::pipeline::fields::{dates, note_type};

use super::Segmenter;

/// Whole-line "day month-name year time" entry header.
static RE_INLINE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}\s+[A-Za-z]{3,9}\s+\d{4}\s+\d{1,2}:\d{2}$").expect("valid regex")
});

/// Trailing dashed signature: long rule, date, time, empty field, name.
static RE_DASHED_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^-{20,}\s*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4}|\d{1,2}\s+[A-Za-z]{3,9}\s+\d{4})\s*,\s*(\d{1,2}:\d{2}(?::\d{2})?)\s*,\s*,\s*(\S.*)$",
    )
    .expect("valid regex")
});

static RE_CONFIRMED_BY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bconfirmed\s+by\s+([A-Za-z][A-Za-z .'-]{1,60}),").expect("valid regex")
});

pub struct EpjsSegmenter {
    timestamp: Option<NaiveDateTime>,
    author: String,
    body: Vec<String>,
}

impl EpjsSegmenter {
    pub fn new() -> Self {
        Self {
            timestamp: None,
            author: String::new(),
            body: Vec::new(),
        }
    }

    fn close(&mut self) -> Option<ClinicalNote> {
        let timestamp = self.timestamp.take();
        let mut author = std::mem::take(&mut self.author);
        let body = std::mem::take(&mut self.body);

        if body.iter().all(|l| l.trim().is_empty()) {
            return None;
        }

        if let Some(confirmed) = body.iter().find_map(|l| RE_CONFIRMED_BY.captures(l)) {
            author = confirmed[1].trim().to_string();
        }
        let note_type = body.first().map(|l| note_type::infer_from_first_line(l));

        Some(ClinicalNote::new(
            timestamp,
            note_type,
            author,
            body.join("\n"),
            SourceDialect::Epjs,
        ))
    }
}

impl Default for EpjsSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_signature_timestamp(date_text: &str, time_text: &str) -> Option<NaiveDateTime> {
    let date = dates::parse_flexible_date(date_text)?.date();
    let time = parse_time(time_text).unwrap_or_default();
    Some(NaiveDateTime::new(date, time))
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

impl Segmenter for EpjsSegmenter {
    fn push_line(&mut self, line: &str) -> Option<ClinicalNote> {
        let trimmed = line.trim();

        if let Some(caps) = RE_DASHED_SIGNATURE.captures(trimmed) {
            // Applies to the note it trails.
            if let Some(ts) = parse_signature_timestamp(&caps[1], &caps[2]) {
                self.timestamp = Some(ts);
            }
            self.author = caps[3].trim().to_string();
            return self.close();
        }

        if RE_INLINE_HEADER.is_match(trimmed) {
            let closed = self.close();
            self.timestamp = dates::parse_flexible_date(trimmed);
            return closed;
        }

        if !trimmed.is_empty() {
            self.body.push(trimmed.to_string());
        }
        None
    }

    fn finish(&mut self) -> Option<ClinicalNote> {
        self.close()
    }
}
