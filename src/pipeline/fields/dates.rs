//! Date parsing cascades.
//!
//! Two distinct windows: general note dates must land in 2000-2100,
//! dates of birth in 1900-2025. Each cascade tries a fixed ordered list
//! of formats against the whole string, then (general cascade only)
//! falls back to extracting a date-shaped substring.

use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::config;

/// Combined date+time formats, tried before date-only forms.
const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d %b %Y %H:%M",
    "%d %B %Y %H:%M",
];

/// Date-only formats in priority order.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d/%m/%y",
    "%Y-%m-%d",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
];

const DOB_FORMATS: &[&str] = &[
    "%d %B %Y",
    "%d %b %Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
];

/// D/M/Y-shaped substring, any of `/`, `-`, `.` as separator.
static RE_LOOSE_DMY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4})\b").expect("valid regex"));

static RE_LOOSE_YMD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").expect("valid regex"));

/// Whole-line date forms used as note-start markers: D/M/Y, Y-M-D and
/// Y-M-D H:M[:S].
static RE_LINE_DMY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{2,4}$").expect("valid regex"));
static RE_LINE_YMD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));
static RE_LINE_YMD_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[ T]\d{1,2}:\d{2}(?::\d{2})?$").expect("valid regex")
});

static RE_LINE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$").expect("valid regex"));

static RE_ORDINAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})(st|nd|rd|th)\b").expect("valid regex"));

fn in_note_window(dt: &NaiveDateTime) -> bool {
    (config::MIN_NOTE_YEAR..=config::MAX_NOTE_YEAR).contains(&dt.date().year())
}

/// Try each format in order, keeping the first parse inside the note
/// window. A parse landing outside the window does not end the cascade:
/// `%Y` happily reads a two-digit year as year 23, so later formats
/// (`%y`) must still get their turn.
fn try_formats(s: &str, datetime_formats: &[&str], date_formats: &[&str]) -> Option<NaiveDateTime> {
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            if in_note_window(&dt) {
                return Some(dt);
            }
        }
    }
    for fmt in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                if in_note_window(&dt) {
                    return Some(dt);
                }
            }
        }
    }
    None
}

/// General date cascade for note timestamps.
///
/// Tries the fixed format lists against the whole (trimmed) string, then
/// attempts to extract a D/M/Y or Y-M-D substring and parse just that.
/// Anything outside 2000-2100 is rejected.
pub fn parse_flexible_date(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(dt) = try_formats(trimmed, DATETIME_FORMATS, DATE_FORMATS) {
        return Some(dt);
    }

    // Loose extraction: a date buried in surrounding prose.
    let substring = RE_LOOSE_YMD
        .captures(trimmed)
        .or_else(|| RE_LOOSE_DMY.captures(trimmed))
        .map(|c| c[1].to_string())?;
    try_formats(&substring, &[], DATE_FORMATS)
}

/// Date-of-birth cascade, separate window (1900-2025).
///
/// Strips ordinal suffixes ("1st" → "1") and commas first, then tries
/// written-month and numeric forms; same-century DOBs fall back to the
/// general cascade.
pub fn parse_dob(s: &str) -> Option<NaiveDate> {
    let cleaned = RE_ORDINAL_SUFFIX.replace_all(s, "$1").replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    let date = DOB_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cleaned, fmt).ok())
        .or_else(|| parse_flexible_date(cleaned).map(|dt| dt.date()))?;

    ((config::MIN_DOB_YEAR..=config::MAX_DOB_YEAR).contains(&date.year())).then_some(date)
}

/// Match a line consisting solely of one of the universal date forms,
/// used as a note-start marker by the CareNotes and generic segmenters.
pub fn match_date_line(line: &str) -> Option<NaiveDateTime> {
    let trimmed = line.trim();
    if RE_LINE_DMY.is_match(trimmed)
        || RE_LINE_YMD.is_match(trimmed)
        || RE_LINE_YMD_TIME.is_match(trimmed)
    {
        parse_flexible_date(trimmed)
    } else {
        None
    }
}

/// Match a line that is only a time of day (`9:30`, `14:05:30`).
pub fn match_time_line(line: &str) -> Option<NaiveTime> {
    let caps = RE_LINE_TIME.captures(line.trim())?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    let second: u32 = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;
    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Convert an Excel serial day number to a calendar date.
/// Excel's day zero is 1899-12-30 (the 1900 leap-year bug absorbed).
pub fn excel_serial_to_date(serial: i64) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_slash_date() {
        let dt = parse_flexible_date("01/02/2023").unwrap();
        assert_eq!(dt.date(), date(2023, 2, 1));
    }

    #[test]
    fn parses_iso_date_and_time() {
        let dt = parse_flexible_date("2023-02-01 09:30:00").unwrap();
        assert_eq!(dt.date(), date(2023, 2, 1));
        assert_eq!(dt.time(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    }

    #[test]
    fn parses_written_month() {
        let dt = parse_flexible_date("1 Feb 2023").unwrap();
        assert_eq!(dt.date(), date(2023, 2, 1));
        let dt = parse_flexible_date("01 February 2023").unwrap();
        assert_eq!(dt.date(), date(2023, 2, 1));
    }

    #[test]
    fn extracts_date_from_surrounding_prose() {
        let dt = parse_flexible_date("seen on ward 14/03/2021 by team").unwrap();
        assert_eq!(dt.date(), date(2021, 3, 14));
    }

    #[test]
    fn rejects_years_outside_note_window() {
        assert!(parse_flexible_date("01/02/1999").is_none());
        assert!(parse_flexible_date("01/02/2101").is_none());
        assert!(parse_flexible_date("01/02/2000").is_some());
        assert!(parse_flexible_date("01/02/2100").is_some());
    }

    #[test]
    fn rejects_non_dates() {
        assert!(parse_flexible_date("").is_none());
        assert!(parse_flexible_date("patient settled overnight").is_none());
        assert!(parse_flexible_date("99/99/2020").is_none());
    }

    #[test]
    fn round_trips_each_recognized_format() {
        let samples = [date(2000, 1, 1), date(2023, 2, 1), date(2100, 12, 31)];
        for d in samples {
            for fmt in DATE_FORMATS {
                // A two-digit year can only represent 2000-2068.
                if *fmt == "%d/%m/%y" && d.year() > 2068 {
                    continue;
                }
                let rendered = d.format(fmt).to_string();
                let parsed = parse_flexible_date(&rendered)
                    .unwrap_or_else(|| panic!("failed to re-parse {rendered} ({fmt})"));
                assert_eq!(parsed.date(), d, "format {fmt}");
            }
        }
    }

    #[test]
    fn dob_round_trips_written_and_numeric() {
        let samples = [date(1900, 1, 1), date(1958, 6, 15), date(2025, 12, 31)];
        for d in samples {
            for fmt in DOB_FORMATS {
                let rendered = d.format(fmt).to_string();
                let parsed = parse_dob(&rendered)
                    .unwrap_or_else(|| panic!("failed to re-parse {rendered} ({fmt})"));
                assert_eq!(parsed, d, "format {fmt}");
            }
        }
    }

    #[test]
    fn dob_strips_ordinal_suffix_and_commas() {
        assert_eq!(parse_dob("1st February 1980").unwrap(), date(1980, 2, 1));
        assert_eq!(parse_dob("3rd March, 1975").unwrap(), date(1975, 3, 3));
        assert_eq!(parse_dob("22nd Nov 1990").unwrap(), date(1990, 11, 22));
    }

    #[test]
    fn dob_window_is_1900_to_2025() {
        assert!(parse_dob("01/01/1899").is_none());
        assert!(parse_dob("01/01/1900").is_some());
        assert!(parse_dob("31/12/2025").is_some());
        assert!(parse_dob("01/01/2026").is_none());
    }

    #[test]
    fn date_line_matches_only_whole_lines() {
        assert!(match_date_line("01/02/2023").is_some());
        assert!(match_date_line("2023-02-01").is_some());
        assert!(match_date_line("2023-02-01 09:30").is_some());
        assert!(match_date_line("seen 01/02/2023 on ward").is_none());
    }

    #[test]
    fn time_line_matches_times_only() {
        assert_eq!(
            match_time_line("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(
            match_time_line("14:05:30").unwrap(),
            NaiveTime::from_hms_opt(14, 5, 30).unwrap()
        );
        assert!(match_time_line("09:30 ward round").is_none());
        assert!(match_time_line("25:00").is_none());
    }

    #[test]
    fn excel_epoch_offsets() {
        // 44927 days from 1899-12-30 is 2023-01-01.
        assert_eq!(excel_serial_to_date(44927).unwrap(), date(2023, 1, 1));
        assert_eq!(excel_serial_to_date(2).unwrap(), date(1900, 1, 1));
    }
}
