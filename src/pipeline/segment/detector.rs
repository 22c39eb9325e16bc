//! Export dialect detection.
//!
//! Inspects a sample from the head of the extracted text and classifies
//! it in fixed priority order: RIO, then EPJS, then CareNotes. The
//! fallback is CareNotes, not the generic segmenter; downstream keyword
//! behavior was tuned against that default, so it stays.

use std::sync::LazyLock;

use regex::Regex;

use crate::config;
use crate::models::SourceDialect;

use super::carenotes::{RE_SIG_DASH, RE_SIG_DOUBLE_COMMA};

static RE_BRACKET_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]\n]+\]").expect("valid regex"));

/// Detection-only form of the EPJS dashed signature: long rule, date,
/// time. Looser than the segmenter's pattern so a stamp whose author
/// field got mangled during extraction still flags the dialect.
static RE_DASHED_STAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^-{20,}\s*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4}|\d{1,2}\s+[A-Za-z]{3,9}\s+\d{4})\s*,?\s*\d{1,2}:\d{2}",
    )
    .expect("valid regex")
});

/// Section-title phrases seen only in CareNotes exports.
const CARENOTES_PHRASES: &[&str] = &[
    "night note entry",
    "day note entry",
    "progress note entry",
    "care plan review",
    "named nurse entry",
];

/// Classify a document from up to the first 200 lines.
pub fn detect_dialect(lines: &[String]) -> SourceDialect {
    let sample = &lines[..lines.len().min(config::SAMPLE_LINES)];
    let joined = sample.join("\n").to_lowercase();

    if joined.contains("originator:") && RE_BRACKET_TAG.is_match(&joined) {
        tracing::debug!(dialect = "rio", "dialect detected");
        return SourceDialect::Rio;
    }

    if sample.iter().any(|l| RE_DASHED_STAMP.is_match(l.trim())) {
        tracing::debug!(dialect = "epjs", "dialect detected");
        return SourceDialect::Epjs;
    }

    let carenotes_signature = sample.iter().any(|l| {
        RE_SIG_DOUBLE_COMMA.is_match(l.trim()) || RE_SIG_DASH.is_match(l.trim())
    });
    if carenotes_signature || CARENOTES_PHRASES.iter().any(|p| joined.contains(p)) {
        tracing::debug!(dialect = "carenotes", "dialect detected");
        return SourceDialect::CareNotes;
    }

    tracing::debug!(dialect = "carenotes", "no dialect markers, using default");
    SourceDialect::CareNotes
}
