use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which hospital export dialect a note was segmented from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceDialect {
    Rio,
    CareNotes,
    Epjs,
    /// Generic fallback for exports with no recognized dialect markers.
    Imported,
}

impl SourceDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rio => "rio",
            Self::CareNotes => "carenotes",
            Self::Epjs => "epjs",
            Self::Imported => "imported",
        }
    }
}

/// Default label applied when no type can be inferred for a note.
pub const DEFAULT_NOTE_TYPE: &str = "Clinical Note";

/// One clinically-distinct entry segmented out of an export file.
/// Immutable once created; lives only as long as the enclosing document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalNote {
    pub id: Uuid,
    /// When the note was written. Falls back to the moment of ingestion
    /// when the export carries no parseable date — never absent.
    pub timestamp: NaiveDateTime,
    pub note_type: String,
    /// Authoring clinician as recorded in the export; empty when unknown.
    pub author: String,
    pub body: String,
    pub dialect: SourceDialect,
}

impl ClinicalNote {
    pub fn new(
        timestamp: Option<NaiveDateTime>,
        note_type: Option<String>,
        author: String,
        body: String,
        dialect: SourceDialect,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: timestamp.unwrap_or_else(|| chrono::Local::now().naive_local()),
            note_type: note_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_NOTE_TYPE.to_string()),
            author,
            body,
            dialect,
        }
    }

    /// Short date used when prefixing categorized excerpts.
    pub fn display_date(&self) -> String {
        self.timestamp.format("%d/%m/%Y").to_string()
    }
}
