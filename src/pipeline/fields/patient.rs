//! Patient demographic extraction.
//!
//! Each field has its own ordered list of labeled-field patterns applied
//! against the whole document text; the first pattern to match wins and
//! later patterns for that field are not tried. DOB is the exception:
//! numeric, written-month and tabular forms are tried in that fixed
//! order, each only when the previous found nothing.

use std::sync::LazyLock;

use regex::Regex;

use super::dates::parse_dob;
use crate::models::{Gender, PatientInfo};

static NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?im)^\s*patient\s+name\s*[:\-]\s*([A-Z][A-Za-z'\-]+)\s+([A-Z][A-Za-z'\-]+)",
        r"(?im)^\s*name\s+of\s+patient\s*[:\-]\s*([A-Z][A-Za-z'\-]+)\s+([A-Z][A-Za-z'\-]+)",
        r"(?im)^\s*name\s*[:\-]\s*([A-Z][A-Za-z'\-]+)\s+([A-Z][A-Za-z'\-]+)",
        r"(?im)^\s*re\s*[:\-]\s*([A-Z][A-Za-z'\-]+)\s+([A-Z][A-Za-z'\-]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// NHS-style identifier: a label followed by 10 digits, optionally
/// space- or hyphen-grouped (`485 777 3456`).
static NHS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bNHS\s*(?:no\.?|number)?\s*[:\-]?\s*(\d[\d \-]{8,12}\d)",
        r"(?i)\bhospital\s+(?:no\.?|number)\s*[:\-]?\s*(\d[\d \-]{5,12}\d)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// DOB label forms, in the fixed numeric → written-month → tabular order.
static DOB_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Numeric: "DOB: 01/02/1980"
        r"(?i)\b(?:DOB|D\.O\.B\.?|date\s+of\s+birth)\s*[:\-]\s*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4})",
        // Written month: "Date of Birth: 1st February 1980"
        r"(?i)\b(?:DOB|D\.O\.B\.?|date\s+of\s+birth)\s*[:\-]?\s*(\d{1,2}(?:st|nd|rd|th)?\s+[A-Za-z]{3,9},?\s+\d{4})",
        // Tabular: label and value separated by a tab or run of spaces
        r"(?im)^\s*(?:DOB|date\s+of\s+birth)(?:\t+| {2,})(\S[^\n]*)$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

fn first_capture_pair<'t>(patterns: &[Regex], text: &'t str) -> Option<(&'t str, &'t str)> {
    for re in patterns {
        if let Some(caps) = re.captures(text) {
            if let (Some(a), Some(b)) = (caps.get(1), caps.get(2)) {
                return Some((a.as_str(), b.as_str()));
            }
        }
    }
    None
}

fn first_capture<'t>(patterns: &[Regex], text: &'t str) -> Option<&'t str> {
    for re in patterns {
        if let Some(caps) = re.captures(text) {
            if let Some(m) = caps.get(1) {
                return Some(m.as_str());
            }
        }
    }
    None
}

/// Gender from substring cues; "female"/"she"/"her" checked first so the
/// embedded "male" in "female" cannot misfire.
fn infer_gender(text: &str) -> Gender {
    let lower = text.to_lowercase();
    let has_word = |w: &str| {
        lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|token| token == w)
    };
    if has_word("female") || has_word("she") || has_word("her") {
        Gender::Female
    } else if has_word("male") || has_word("he") || has_word("his") {
        Gender::Male
    } else {
        Gender::Unspecified
    }
}

/// Extract demographics from the full document text, best-effort.
pub fn extract_patient_info(text: &str) -> PatientInfo {
    let mut info = PatientInfo::default();

    if let Some((first, last)) = first_capture_pair(&NAME_PATTERNS, text) {
        info.first_name = first.to_string();
        info.last_name = last.to_string();
    }

    if let Some(raw) = first_capture(&NHS_PATTERNS, text) {
        info.nhs_number = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    }

    for re in DOB_PATTERNS.iter() {
        if let Some(caps) = re.captures(text) {
            if let Some(dob) = parse_dob(&caps[1]) {
                info.date_of_birth = Some(dob);
                break;
            }
        }
    }

    info.gender = infer_gender(text);

    tracing::debug!(
        has_name = !info.first_name.is_empty(),
        has_nhs = !info.nhs_number.is_empty(),
        has_dob = info.date_of_birth.is_some(),
        gender = info.gender.as_str(),
        "patient extraction finished"
    );
    info
}
