//! Spreadsheet (.xlsx) text extraction.
//!
//! Pulls `xl/sharedStrings.xml` and `xl/worksheets/sheet1.xml` out of the
//! container, resolves shared-string cells, and renders each row as one
//! tab-free text line. Bare five-digit numerics in the plausible serial
//! range are Excel day numbers and get rendered as calendar dates.

use std::sync::LazyLock;

use regex::Regex;

use super::xml::decode_entities;
use super::{zip, ContainerError};
use crate::config;
use crate::pipeline::fields::dates::excel_serial_to_date;

const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const FIRST_SHEET_PART: &str = "xl/worksheets/sheet1.xml";

/// `<si>...</si>` shared-string items; rich-text runs hold several `<t>`.
static RE_SI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<si>(.*?)</si>").expect("valid regex"));
static RE_T: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<t[^>]*>(.*?)</t>").expect("valid regex"));

static RE_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<row[^>]*>(.*?)</row>").expect("valid regex"));
static RE_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<c([^>]*)>(.*?)</c>"#).expect("valid regex"));
static RE_CELL_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"t="([^"]+)""#).expect("valid regex"));
static RE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<v>(.*?)</v>").expect("valid regex"));

static RE_SERIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}$").expect("valid regex"));

/// Extract all cell text from the first worksheet, one row per line.
pub fn extract_spreadsheet_text(bytes: &[u8]) -> Result<String, ContainerError> {
    let shared = match zip::extract_entry(bytes, SHARED_STRINGS_PART) {
        Ok(xml) => parse_shared_strings(&xml),
        // A workbook with only inline/numeric cells has no shared strings.
        Err(ContainerError::EntryNotFound(_)) => Vec::new(),
        Err(e) => return Err(e),
    };

    let sheet_xml = zip::extract_entry(bytes, FIRST_SHEET_PART)?;

    let mut lines = Vec::new();
    for row in RE_ROW.captures_iter(&sheet_xml) {
        let mut cells = Vec::new();
        for cell in RE_CELL.captures_iter(&row[1]) {
            let attrs = &cell[1];
            let inner = &cell[2];
            let value = resolve_cell(attrs, inner, &shared);
            if !value.is_empty() {
                cells.push(value);
            }
        }
        if !cells.is_empty() {
            lines.push(cells.join(" "));
        }
    }

    tracing::debug!(
        rows = lines.len(),
        shared_strings = shared.len(),
        "spreadsheet text extracted"
    );
    Ok(lines.join("\n"))
}

fn parse_shared_strings(xml: &str) -> Vec<String> {
    RE_SI
        .captures_iter(xml)
        .map(|si| {
            RE_T.captures_iter(&si[1])
                .map(|t| decode_entities(&t[1]))
                .collect::<Vec<_>>()
                .concat()
        })
        .collect()
}

fn resolve_cell(attrs: &str, inner: &str, shared: &[String]) -> String {
    let cell_type = RE_CELL_TYPE
        .captures(attrs)
        .map(|c| c[1].to_string())
        .unwrap_or_default();

    // Inline strings carry their text directly.
    if cell_type == "inlineStr" {
        return RE_T
            .captures_iter(inner)
            .map(|t| decode_entities(&t[1]))
            .collect::<Vec<_>>()
            .concat()
            .trim()
            .to_string();
    }

    let Some(value) = RE_VALUE.captures(inner).map(|v| decode_entities(&v[1])) else {
        return String::new();
    };
    let value = value.trim().to_string();

    if cell_type == "s" {
        return value
            .parse::<usize>()
            .ok()
            .and_then(|idx| shared.get(idx))
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
    }

    clean_cell_value(&value)
}

/// A bare five-digit numeric in the plausible range is an Excel date
/// serial; render it as a calendar date instead of a raw number.
pub fn clean_cell_value(value: &str) -> String {
    if RE_SERIAL.is_match(value) {
        if let Ok(serial) = value.parse::<i64>() {
            if (config::EXCEL_SERIAL_MIN..=config::EXCEL_SERIAL_MAX).contains(&serial) {
                if let Some(date) = excel_serial_to_date(serial) {
                    return date.format("%d/%m/%Y").to_string();
                }
            }
        }
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::container::zip::tests::build_zip;

    fn workbook(shared: &str, sheet: &str) -> Vec<u8> {
        build_zip(&[
            (SHARED_STRINGS_PART, shared, true),
            (FIRST_SHEET_PART, sheet, true),
        ])
    }

    #[test]
    fn resolves_shared_string_cells() {
        let shared = "<sst><si><t>Progress note</t></si><si><t>Dr Smith</t></si></sst>";
        let sheet = r#"<worksheet><sheetData>
            <row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
        </sheetData></worksheet>"#;
        let text = extract_spreadsheet_text(&workbook(shared, sheet)).unwrap();
        assert_eq!(text, "Progress note Dr Smith");
    }

    #[test]
    fn date_serial_becomes_display_date() {
        let sheet = r#"<worksheet><sheetData>
            <row r="1"><c r="A1"><v>44927</v></c></row>
        </sheetData></worksheet>"#;
        let zip = build_zip(&[(FIRST_SHEET_PART, sheet, true)]);
        let text = extract_spreadsheet_text(&zip).unwrap();
        assert_eq!(text, "01/01/2023");
    }

    #[test]
    fn plain_numbers_left_alone() {
        assert_eq!(clean_cell_value("42"), "42");
        assert_eq!(clean_cell_value("12345678"), "12345678");
        // Five digits but outside the plausible serial range.
        assert_eq!(clean_cell_value("10000"), "10000");
        assert_eq!(clean_cell_value("99999"), "99999");
    }

    #[test]
    fn inline_string_cells() {
        let sheet = r#"<worksheet><sheetData>
            <row r="1"><c r="A1" t="inlineStr"><is><t>settled overnight</t></is></c></row>
        </sheetData></worksheet>"#;
        let zip = build_zip(&[(FIRST_SHEET_PART, sheet, true)]);
        let text = extract_spreadsheet_text(&zip).unwrap();
        assert_eq!(text, "settled overnight");
    }

    #[test]
    fn rows_become_separate_lines() {
        let sheet = r#"<worksheet><sheetData>
            <row r="1"><c r="A1"><v>1111</v></c></row>
            <row r="2"><c r="A2"><v>2222</v></c></row>
        </sheetData></worksheet>"#;
        let zip = build_zip(&[(FIRST_SHEET_PART, sheet, true)]);
        let text = extract_spreadsheet_text(&zip).unwrap();
        assert_eq!(text, "1111\n2222");
    }

    #[test]
    fn missing_shared_strings_is_tolerated() {
        let sheet = "<worksheet><sheetData><row><c><v>77</v></c></row></sheetData></worksheet>";
        let zip = build_zip(&[(FIRST_SHEET_PART, sheet, true)]);
        assert_eq!(extract_spreadsheet_text(&zip).unwrap(), "77");
    }

    #[test]
    fn missing_sheet_is_error() {
        let zip = build_zip(&[("xl/styles.xml", "<x/>", true)]);
        assert!(extract_spreadsheet_text(&zip).is_err());
    }

    #[test]
    fn rich_text_shared_string_concatenates_runs() {
        let shared = "<sst><si><r><t>Ward </t></r><r><t>round</t></r></si></sst>";
        let sheet = r#"<worksheet><sheetData><row><c t="s"><v>0</v></c></row></sheetData></worksheet>"#;
        let text = extract_spreadsheet_text(&workbook(shared, sheet)).unwrap();
        assert_eq!(text, "Ward round");
    }
}
