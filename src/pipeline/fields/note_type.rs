//! Note-type canonicalization.
//!
//! Export dialects label entries inconsistently ("Nursing note entry",
//! "[Nursing]", "Ward Round: ..."); a keyword table folds these into a
//! small set of service labels. Anything unrecognized keeps its own text.

use crate::config;
use crate::models::DEFAULT_NOTE_TYPE;

/// Keyword → canonical label, checked in order, first match wins.
const TYPE_KEYWORDS: &[(&str, &str)] = &[
    ("nurs", "Nursing"),
    ("ward round", "Medical"),
    ("medic", "Medical"),
    ("doctor", "Medical"),
    ("psychiat", "Psychiatry"),
    ("psychol", "Psychology"),
    ("occupational", "Occupational Therapy"),
    ("physio", "Physiotherapy"),
    ("social", "Social Work"),
    ("pharmac", "Pharmacy"),
];

/// Fold a raw type label into its canonical service name.
/// Unmatched non-empty labels pass through untouched; empty input gets
/// the default label.
pub fn canonicalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_NOTE_TYPE.to_string();
    }
    let lower = trimmed.to_lowercase();
    for (keyword, label) in TYPE_KEYWORDS {
        if lower.contains(keyword) {
            return (*label).to_string();
        }
    }
    trimmed.to_string()
}

/// Infer a note type from its first body line: the text before the first
/// colon, when short and free of digits; otherwise the default label.
pub fn infer_from_first_line(line: &str) -> String {
    let Some(idx) = line.find(':') else {
        return DEFAULT_NOTE_TYPE.to_string();
    };
    let head = line[..idx].trim();
    if head.is_empty()
        || head.len() > config::TYPE_PREFIX_MAX_CHARS
        || head.chars().any(|c| c.is_ascii_digit())
    {
        return DEFAULT_NOTE_TYPE.to_string();
    }
    canonicalize(head)
}
