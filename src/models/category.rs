use serde::{Deserialize, Serialize};

/// Fixed set of clinical topic buckets used when classifying note bodies.
///
/// Declaration order is matching priority: when a header line could belong
/// to more than one category, the first category whose keyword matches
/// wins. `Summary` doubles as the fallback bucket when nothing in the
/// whole document classifies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ClinicalCategory {
    Summary,
    MentalState,
    Risk,
    Medication,
    PhysicalHealth,
    SocialCircumstances,
    ForensicHistory,
}

impl ClinicalCategory {
    /// All categories in declaration (= matching-priority) order.
    pub const ALL: [ClinicalCategory; 7] = [
        Self::Summary,
        Self::MentalState,
        Self::Risk,
        Self::Medication,
        Self::PhysicalHealth,
        Self::SocialCircumstances,
        Self::ForensicHistory,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Summary => "Summary",
            Self::MentalState => "Mental State",
            Self::Risk => "Risk",
            Self::Medication => "Medication",
            Self::PhysicalHealth => "Physical Health",
            Self::SocialCircumstances => "Social Circumstances",
            Self::ForensicHistory => "Forensic History",
        }
    }

    /// Detection keywords, matched lowercase, in declared order.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Summary => &["summary", "overview", "impression"],
            Self::MentalState => &[
                "mental state",
                "mse",
                "mood",
                "affect",
                "thought",
                "perception",
                "cognition",
            ],
            Self::Risk => &[
                "risk",
                "self-harm",
                "self harm",
                "suicid",
                "harm to others",
                "safeguarding",
            ],
            Self::Medication => &[
                "medication",
                "medicine",
                "prescri",
                "dose",
                "depot",
                "clozapine",
            ],
            Self::PhysicalHealth => &[
                "physical health",
                "physical obs",
                "blood pressure",
                "bloods",
                "ecg",
                "weight",
            ],
            Self::SocialCircumstances => &[
                "social circumstances",
                "housing",
                "accommodation",
                "finances",
                "employment",
            ],
            Self::ForensicHistory => &[
                "forensic",
                "index offence",
                "offending",
                "conviction",
            ],
        }
    }
}
