use crate::models::{CanonicalField, ExtractionRules};
use crate::processing::patterns;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseIssue {
    /// A diagnosis code bled into the payer field from a mis-split line
    DiagnosisCodeInPayer,
    /// The clinic's own front-desk number, not the patient's
    ClinicNumber,
}

impl NoiseIssue {
    pub fn message(&self) -> &'static str {
        match self {
            NoiseIssue::DiagnosisCodeInPayer => "payer value contains an ICD-10 code",
            NoiseIssue::ClinicNumber => "clinic front-desk number",
        }
    }
}

/// Field-specific exclusions applied to candidates after label resolution.
pub struct NoiseFilter<'a> {
    rules: &'a ExtractionRules,
}

impl<'a> NoiseFilter<'a> {
    pub fn new(rules: &'a ExtractionRules) -> Self {
        NoiseFilter { rules }
    }

    pub fn check(&self, field: CanonicalField, value: &str) -> Result<(), NoiseIssue> {
        match field {
            CanonicalField::PrimaryPayer if patterns::contains_icd10(value) => {
                Err(NoiseIssue::DiagnosisCodeInPayer)
            }
            CanonicalField::PatientPhone if self.is_clinic_number(value) => {
                Err(NoiseIssue::ClinicNumber)
            }
            _ => Ok(()),
        }
    }

    /// True when the digits of `value` contain the digits of a configured clinic number.
    pub fn is_clinic_number(&self, value: &str) -> bool {
        let digits = digits_only(value);
        self.rules
            .clinic_numbers
            .iter()
            .map(|number| digits_only(number))
            .any(|number| !number.is_empty() && digits.contains(&number))
    }
}

fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}
