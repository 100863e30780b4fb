use crate::models::{CanonicalField, ExtractionRules};

/// FieldCorrection replaces known OCR misreadings with the value the form
/// actually carries. Only the physician name has a correction table.
pub struct FieldCorrection<'a> {
    rules: &'a ExtractionRules,
}

impl<'a> FieldCorrection<'a> {
    pub fn new(rules: &'a ExtractionRules) -> Self {
        FieldCorrection { rules }
    }

    /// Returns the corrected value, or the input unchanged.
    pub fn correct(&self, field: CanonicalField, value: String) -> String {
        if field != CanonicalField::PhysicianName {
            return value;
        }
        let lower = value.to_lowercase();
        for (misspelling, corrected) in &self.rules.physician_corrections {
            if lower.contains(misspelling.as_str()) {
                if *corrected != value {
                    log::debug!("{}: corrected '{}' -> '{}'", field, value, corrected);
                }
                return corrected.clone();
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physician_misspelling_replaces_whole_value() {
        let rules = ExtractionRules::default();
        let correction = FieldCorrection::new(&rules);
        assert_eq!(
            correction.correct(CanonicalField::PhysicianName, "STEVE TISKILES MD".to_string()),
            "Steven Skules"
        );
        assert_eq!(
            correction.correct(CanonicalField::PhysicianName, "Dr Skules, ortho".to_string()),
            "Steven Skules"
        );
    }

    #[test]
    fn test_other_names_untouched() {
        let rules = ExtractionRules::default();
        let correction = FieldCorrection::new(&rules);
        assert_eq!(
            correction.correct(CanonicalField::PhysicianName, "Anna K. Lee".to_string()),
            "Anna K. Lee"
        );
    }

    #[test]
    fn test_only_physician_field_is_corrected() {
        let rules = ExtractionRules::default();
        let correction = FieldCorrection::new(&rules);
        assert_eq!(
            correction.correct(CanonicalField::AssistSurgeon, "Steve Tiskiles".to_string()),
            "Steve Tiskiles"
        );
    }
}
