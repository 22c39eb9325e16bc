use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::category::ClinicalCategory;
use super::note::ClinicalNote;
use super::patient::PatientInfo;

/// Final pipeline output for one imported file.
///
/// Consumers get read-only access to the notes, the best-effort patient
/// demographics and the per-category excerpt lists; nothing here is
/// mutated after the pipeline returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// The raw extracted text, lines joined with `\n`.
    pub full_text: String,
    /// Notes in the order they were encountered in the export.
    pub notes: Vec<ClinicalNote>,
    pub patient: PatientInfo,
    /// Date-prefixed excerpts per category, in note-processing order.
    pub categories: BTreeMap<ClinicalCategory, Vec<String>>,
}
