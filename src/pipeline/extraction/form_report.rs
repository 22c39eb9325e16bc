//! Reassembly of XFA field values into a readable report.
//!
//! The tribunal-report form names its fields mechanically
//! (`Q5_TextField`); a fixed mapping restores each field's ordinal and
//! human section title, and the sections come out ordinal-sorted as a
//! numbered plain-text report.

use std::collections::BTreeMap;

struct FormField {
    key: &'static str,
    ordinal: u32,
    title: &'static str,
}

const fn field(key: &'static str, ordinal: u32, title: &'static str) -> FormField {
    FormField { key, ordinal, title }
}

/// Known form fields. Several legacy form revisions name the same
/// section differently, so some ordinals have more than one key.
const FORM_FIELDS: &[FormField] = &[
    field("Q1_TextField", 1, "Patient details"),
    field("PatientDetails", 1, "Patient details"),
    field("Q2_TextField", 2, "Current mental state"),
    field("Q3_TextField", 3, "Diagnosis"),
    field("Diagnosis", 3, "Diagnosis"),
    field("Q4_TextField", 4, "Treatment and response"),
    field("Q5_TextField", 5, "Index offence and forensic history"),
    field("IndexOffence", 5, "Index offence and forensic history"),
    field("Q6_TextField", 6, "Risk assessment"),
    field("RiskAssessment", 6, "Risk assessment"),
    field("Q7_TextField", 7, "Physical health"),
    field("Q8_TextField", 8, "Social circumstances"),
    field("Q9_TextField", 9, "Patient views"),
    field("Q10_TextField", 10, "Leave and conditions"),
    field("Q11_TextField", 11, "Aftercare plan"),
    field("Q12_TextField", 12, "Recommendations"),
];

/// Assemble a numbered, titled plain-text report from a flat field map.
///
/// Unknown fields are ignored; duplicate ordinals merge their content
/// with a blank-line separator; sections come out sorted by ordinal. An
/// empty result means no known field carried text.
pub fn assemble_report(fields: &BTreeMap<String, String>) -> String {
    let mut sections: BTreeMap<u32, (&'static str, Vec<&str>)> = BTreeMap::new();

    for form_field in FORM_FIELDS {
        let Some(value) = fields.get(form_field.key) else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        sections
            .entry(form_field.ordinal)
            .or_insert((form_field.title, Vec::new()))
            .1
            .push(value);
    }

    sections
        .into_iter()
        .map(|(ordinal, (title, chunks))| {
            format!("{ordinal}. {title}\n{}", chunks.join("\n\n"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn numbered_titled_sections_in_ordinal_order() {
        let fields = map(&[
            ("Q5_TextField", "history of self-harm"),
            ("Q2_TextField", "settled on the ward"),
        ]);
        let report = assemble_report(&fields);
        let q2 = report.find("2. Current mental state").unwrap();
        let q5 = report.find("5. Index offence and forensic history").unwrap();
        assert!(q2 < q5, "sections must be ordinal-sorted");
        assert!(report.contains("5. Index offence and forensic history\nhistory of self-harm"));
    }

    #[test]
    fn duplicate_ordinals_merge_with_blank_line() {
        let fields = map(&[
            ("Q5_TextField", "from the current form"),
            ("IndexOffence", "from a legacy revision"),
        ]);
        let report = assemble_report(&fields);
        assert_eq!(report.matches("Index offence").count(), 1);
        assert!(report.contains("from the current form\n\nfrom a legacy revision"));
    }

    #[test]
    fn unknown_and_empty_fields_are_ignored() {
        let fields = map(&[("SomeConfigKnob", "x"), ("Q3_TextField", "   ")]);
        assert_eq!(assemble_report(&fields), "");
    }

    #[test]
    fn no_fields_is_empty_report() {
        assert_eq!(assemble_report(&BTreeMap::new()), "");
    }
}
