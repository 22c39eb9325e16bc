//! Pipeline tuning constants and logging setup.

/// Lines sampled from the head of a document for dialect detection.
pub const SAMPLE_LINES: usize = 200;

/// Hard cap on PDF pages read through the embedded text layer.
pub const MAX_TEXT_PAGES: usize = 50;

/// Hard cap on PDF pages rasterized for OCR.
pub const MAX_OCR_PAGES: usize = 20;

/// Rendering resolution for OCR rasterization.
pub const OCR_RENDER_DPI: u32 = 144;

/// A text layer shorter than this (non-whitespace chars) is treated as a
/// placeholder shell rather than real content.
pub const PLACEHOLDER_MIN_CHARS: usize = 100;

/// Non-empty lines probed for a date after a RIO note-start marker.
pub const DATE_PROBE_LINES: usize = 5;

/// Trailing lines scanned backward for a CareNotes signature.
pub const SIGNATURE_SCAN_LINES: usize = 5;

/// A category header line longer than this is only matched at anchors.
pub const SHORT_HEADER_MAX_CHARS: usize = 50;

/// Longest before-colon prefix accepted as a note-type label.
pub const TYPE_PREFIX_MAX_CHARS: usize = 40;

/// Accepted year window for note timestamps.
pub const MIN_NOTE_YEAR: i32 = 2000;
pub const MAX_NOTE_YEAR: i32 = 2100;

/// Accepted year window for dates of birth.
pub const MIN_DOB_YEAR: i32 = 1900;
pub const MAX_DOB_YEAR: i32 = 2025;

/// Plausible Excel serial day range (1982 through 2064); bare five-digit
/// cell values inside it are rendered as dates.
pub const EXCEL_SERIAL_MIN: i64 = 30_000;
pub const EXCEL_SERIAL_MAX: i64 = 60_000;

/// Install the global tracing subscriber. Safe to call more than once;
/// later calls are no-ops.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
