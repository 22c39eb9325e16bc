use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unspecified,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unspecified => "unspecified",
        }
    }
}

/// Demographics extracted from the document text, best-effort.
/// A field stays empty when no extraction pattern matched for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub first_name: String,
    pub last_name: String,
    /// NHS-style identifier, digits only, separators stripped.
    pub nhs_number: String,
    /// Only accepted for years 1900-2025.
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Gender,
}

impl PatientInfo {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_empty()
            && self.last_name.is_empty()
            && self.nhs_number.is_empty()
            && self.date_of_birth.is_none()
            && self.gender == Gender::Unspecified
    }
}
