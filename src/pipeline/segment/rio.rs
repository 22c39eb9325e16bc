//! RIO export segmentation.
//!
//! RIO exports open each entry with an `Originator: <name>` line, follow
//! it with a handful of header lines (one of which usually carries the
//! entry date), and tag the discipline in square brackets on the first
//! content line. Action buttons flattened into the text ("Detail",
//! "Amend", "Lock") are UI chrome, not record content.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::config;
use crate::models::{ClinicalNote, SourceDialect};
use crate::pipeline::fields::{dates, note_type};

use super::Segmenter;

static RE_BRACKET_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]\s*(.*)$").expect("valid regex"));

const CHROME_WORDS: &[&str] = &["detail", "amend", "lock"];

pub struct RioSegmenter {
    author: String,
    timestamp: Option<NaiveDateTime>,
    note_type: Option<String>,
    body: Vec<String>,
    /// Non-empty lines still eligible for the date probe; zero outside
    /// the probe window.
    probe_remaining: usize,
    started: bool,
}

impl RioSegmenter {
    pub fn new() -> Self {
        Self {
            author: String::new(),
            timestamp: None,
            note_type: None,
            body: Vec::new(),
            probe_remaining: 0,
            started: false,
        }
    }

    fn close(&mut self) -> Option<ClinicalNote> {
        let body = self.body.join("\n");
        let note = (!body.trim().is_empty()).then(|| {
            ClinicalNote::new(
                self.timestamp.take(),
                self.note_type.take(),
                std::mem::take(&mut self.author),
                body,
                SourceDialect::Rio,
            )
        });
        self.timestamp = None;
        self.note_type = None;
        self.author.clear();
        self.body.clear();
        self.probe_remaining = 0;
        note
    }
}

impl Default for RioSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for RioSegmenter {
    fn push_line(&mut self, line: &str) -> Option<ClinicalNote> {
        let trimmed = line.trim();
        let lower = trimmed.to_lowercase();

        const MARKER: &str = "originator:";
        if lower.starts_with(MARKER) {
            let closed = self.close();
            self.started = true;
            self.author = trimmed[MARKER.len()..].trim().to_string();
            self.probe_remaining = config::DATE_PROBE_LINES;
            return closed;
        }

        if !self.started || trimmed.is_empty() {
            return None;
        }

        if CHROME_WORDS.contains(&lower.as_str()) {
            return None;
        }

        // Header lines after the marker are probed for the entry date;
        // the first parseable one is consumed, the rest fall through to
        // the body.
        if self.probe_remaining > 0 {
            self.probe_remaining -= 1;
            if self.timestamp.is_none() {
                if let Some(dt) = dates::parse_flexible_date(trimmed) {
                    self.timestamp = Some(dt);
                    self.probe_remaining = 0;
                    return None;
                }
            }
        }

        if self.note_type.is_none() {
            if let Some(caps) = RE_BRACKET_TAG.captures(trimmed) {
                self.note_type = Some(note_type::canonicalize(&caps[1]));
                let rest = caps[2].trim();
                if !rest.is_empty() {
                    self.body.push(rest.to_string());
                }
                return None;
            }
        }

        self.body.push(trimmed.to_string());
        None
    }

    fn finish(&mut self) -> Option<ClinicalNote> {
        self.close()
    }
}
