//! Category classification of note bodies.
//!
//! Each note body is split into blocks at header lines that carry a
//! category keyword. A keyword counts as a header when it sits at the
//! start of the line or right after a bullet or colon; short lines
//! (under 50 chars) are loose enough that the keyword may sit anywhere.
//! Text after the header's first colon belongs to the new block. Every
//! categorized block becomes one excerpt, prefixed with the note's
//! display date. A document in which nothing classifies at all falls
//! back to filing each note's full body under Summary.

use std::collections::BTreeMap;

use crate::config;
use crate::models::{ClinicalCategory, ClinicalNote};

struct CategoryBlock {
    category: ClinicalCategory,
    lines: Vec<String>,
}

/// Categorize every note's body into per-category excerpt lists.
pub fn categorize_notes(notes: &[ClinicalNote]) -> BTreeMap<ClinicalCategory, Vec<String>> {
    let mut excerpts: BTreeMap<ClinicalCategory, Vec<String>> = BTreeMap::new();

    for note in notes {
        for block in split_blocks(&note.body) {
            let text = block.lines.join("\n");
            if text.trim().is_empty() {
                continue;
            }
            excerpts
                .entry(block.category)
                .or_default()
                .push(format!("[{}] {}", note.display_date(), text));
        }
    }

    if excerpts.is_empty() && !notes.is_empty() {
        tracing::debug!(notes = notes.len(), "no category headers found, filing under summary");
        let fallback = notes
            .iter()
            .filter(|n| !n.body.trim().is_empty())
            .map(|n| format!("[{}] {}", n.display_date(), n.body))
            .collect::<Vec<_>>();
        if !fallback.is_empty() {
            excerpts.insert(ClinicalCategory::Summary, fallback);
        }
    }

    excerpts
}

fn split_blocks(body: &str) -> Vec<CategoryBlock> {
    let mut blocks: Vec<CategoryBlock> = Vec::new();

    for line in body.lines() {
        if let Some(category) = header_category(line) {
            let first = line
                .split_once(':')
                .map(|(_, rest)| rest.trim())
                .unwrap_or("");
            let mut lines = Vec::new();
            if !first.is_empty() {
                lines.push(first.to_string());
            }
            blocks.push(CategoryBlock { category, lines });
        } else if let Some(open) = blocks.last_mut() {
            open.lines.push(line.to_string());
        }
    }

    blocks
}

/// Match a line against each category's keywords in priority order.
/// Keywords anchor at line start or just after a bullet or colon; lines
/// short enough to be headers in their own right match anywhere.
fn header_category(line: &str) -> Option<ClinicalCategory> {
    let lower = line.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }
    let loose = lower.chars().count() < config::SHORT_HEADER_MAX_CHARS;

    for category in ClinicalCategory::ALL {
        for keyword in category.keywords() {
            if keyword_is_header(&lower, keyword, loose) {
                return Some(category);
            }
        }
    }
    None
}

fn keyword_is_header(lower: &str, keyword: &str, loose: bool) -> bool {
    if loose {
        return lower.contains(keyword);
    }
    if lower.starts_with(keyword) {
        return true;
    }
    lower.match_indices(keyword).any(|(pos, _)| {
        lower[..pos]
            .trim_end()
            .ends_with(|c: char| matches!(c, ':' | '-' | '*' | '\u{2022}'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceDialect;
    use chrono::NaiveDate;

    fn note(body: &str) -> ClinicalNote {
        let ts = NaiveDate::from_ymd_opt(2023, 2, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        ClinicalNote::new(
            Some(ts),
            None,
            String::new(),
            body.to_string(),
            SourceDialect::CareNotes,
        )
    }

    #[test]
    fn headers_split_body_into_category_blocks() {
        let notes = vec![note(
            "Mental state: calm and settled\npleasant and cooperative\nRisk: no current concerns",
        )];
        let map = categorize_notes(&notes);

        let mse = &map[&ClinicalCategory::MentalState];
        assert_eq!(mse.len(), 1);
        assert_eq!(mse[0], "[01/02/2023] calm and settled\npleasant and cooperative");

        let risk = &map[&ClinicalCategory::Risk];
        assert_eq!(risk[0], "[01/02/2023] no current concerns");
    }

    #[test]
    fn priority_order_breaks_keyword_ties() {
        // "summary" and "risk" both present; Summary is declared first.
        let notes = vec![note("Summary of risk\ncontent")];
        let map = categorize_notes(&notes);
        assert!(map.contains_key(&ClinicalCategory::Summary));
        assert!(!map.contains_key(&ClinicalCategory::Risk));
    }

    #[test]
    fn long_line_needs_anchor() {
        let long = "the patient mentioned medication in passing during a much longer conversation";
        assert!(long.len() >= 50);
        let map = categorize_notes(&[note(long)]);
        // No header anywhere, so the whole body falls back to Summary.
        assert_eq!(map.len(), 1);
        assert!(map.contains_key(&ClinicalCategory::Summary));
    }

    #[test]
    fn short_line_matches_keyword_anywhere() {
        let notes = vec![note("current medication list\nolanzapine 10mg")];
        let map = categorize_notes(&notes);
        let meds = &map[&ClinicalCategory::Medication];
        assert!(meds[0].contains("olanzapine 10mg"));
    }

    #[test]
    fn nothing_classified_falls_back_to_summary_per_note() {
        let bodies = [
            "went to the shop with staff escort and returned on time without incident whatsoever",
            "phone call from relative about visiting arrangements for the coming weekend period",
        ];
        let notes: Vec<ClinicalNote> = bodies.iter().map(|b| note(b)).collect();
        let map = categorize_notes(&notes);
        assert_eq!(map.len(), 1);
        assert_eq!(map[&ClinicalCategory::Summary].len(), 2);
    }

    #[test]
    fn empty_notes_produce_empty_map() {
        assert!(categorize_notes(&[]).is_empty());
    }

    #[test]
    fn classification_is_idempotent_over_emitted_excerpts() {
        // A date-prefixed excerpt fed back through classification keeps
        // its content in the same category.
        let excerpt = "[01/02/2023] Risk: none identified";
        let map = categorize_notes(&[note(excerpt)]);
        assert_eq!(map.len(), 1);
        assert!(map[&ClinicalCategory::Risk][0].contains("none identified"));
    }

    #[test]
    fn short_header_limit_counts_chars_not_bytes() {
        let header = "té té té té té té té té té medication noted";
        assert!(header.len() >= 50);
        assert!(header.chars().count() < 50);
        let body = format!("{header}\nolanzapine 10mg");
        let map = categorize_notes(&[note(&body)]);
        assert!(map.contains_key(&ClinicalCategory::Medication));
    }

    #[test]
    fn classification_is_deterministic() {
        let notes = vec![note("Risk: none identified\nMedication: unchanged")];
        let first = categorize_notes(&notes);
        let second = categorize_notes(&notes);
        assert_eq!(first, second);
    }
}
