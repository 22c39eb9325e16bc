pub mod carenotes;
pub mod detector;
pub mod epjs;
pub mod generic;
pub mod rio;

use crate::models::{ClinicalNote, SourceDialect};

/// Line-at-a-time note segmentation.
///
/// Each dialect is a small state machine over an ordered line sequence:
/// feeding a line may close (emit) the note in progress, and `finish`
/// flushes the final in-progress note at end of input. A note with an
/// empty accumulated body is never emitted.
pub trait Segmenter {
    fn push_line(&mut self, line: &str) -> Option<ClinicalNote>;
    fn finish(&mut self) -> Option<ClinicalNote>;
}

/// Run the segmenter for the given dialect over all lines.
pub fn segment_lines(lines: &[String], dialect: SourceDialect) -> Vec<ClinicalNote> {
    let mut segmenter: Box<dyn Segmenter> = match dialect {
        SourceDialect::Rio => Box::new(rio::RioSegmenter::new()),
        SourceDialect::CareNotes => Box::new(carenotes::CareNotesSegmenter::new()),
        SourceDialect::Epjs => Box::new(epjs::EpjsSegmenter::new()),
        SourceDialect::Imported => Box::new(generic::GenericSegmenter::new()),
    };

    let mut notes = Vec::new();
    for line in lines {
        if let Some(note) = segmenter.push_line(line) {
            notes.push(note);
        }
    }
    if let Some(note) = segmenter.finish() {
        notes.push(note);
    }

    tracing::debug!(dialect = dialect.as_str(), notes = notes.len(), "segmentation complete");
    notes
}
