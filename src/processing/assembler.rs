use crate::models::{CanonicalField, ExtractionResult, FieldStatus, Provenance, NOT_PROVIDED};
use std::collections::BTreeMap;

/// Working record for one extraction. Each field is written at most once;
/// a later rejection clears the value and pins the status.
#[derive(Debug, Default)]
pub struct PartialRecord {
    values: BTreeMap<CanonicalField, (String, Provenance)>,
    rejections: BTreeMap<CanonicalField, FieldStatus>,
}

impl PartialRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self, field: CanonicalField) -> bool {
        self.values.contains_key(&field) || self.rejections.contains_key(&field)
    }

    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.values.get(&field).map(|(value, _)| value.as_str())
    }

    /// Store `value` unless the field already holds a value or a rejection.
    pub fn fill(&mut self, field: CanonicalField, value: String, provenance: Provenance) -> bool {
        if self.is_set(field) {
            return false;
        }
        self.values.insert(field, (value, provenance));
        true
    }

    pub fn reject(&mut self, field: CanonicalField, status: FieldStatus) {
        if let Some((value, _)) = self.values.remove(&field) {
            log::debug!("{}: '{}' downgraded ({})", field, value, status);
        }
        self.rejections.insert(field, status);
    }

    /// Close the record over the full field set. Unset fields become the
    /// placeholder with status `missing`.
    pub fn finish(mut self) -> ExtractionResult {
        let mut metadata = BTreeMap::new();
        let mut validations = BTreeMap::new();
        let mut provenance = BTreeMap::new();

        for field in CanonicalField::ALL {
            match self.values.remove(&field) {
                Some((value, source)) => {
                    metadata.insert(field, value);
                    validations.insert(field, FieldStatus::Accepted);
                    provenance.insert(field, source);
                }
                None => {
                    metadata.insert(field, NOT_PROVIDED.to_string());
                    let status = self
                        .rejections
                        .get(&field)
                        .copied()
                        .unwrap_or(FieldStatus::Missing);
                    validations.insert(field, status);
                }
            }
        }

        let result = ExtractionResult {
            metadata,
            validations,
            provenance,
        };
        log::info!(
            "extraction finished: {} of {} fields accepted",
            result.accepted_count(),
            CanonicalField::ALL.len()
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Strategy;

    fn at_line(line: usize) -> Provenance {
        Provenance {
            strategy: Strategy::LabelScan,
            line: Some(line),
        }
    }

    #[test]
    fn test_empty_record_is_all_missing() {
        let result = PartialRecord::new().finish();
        assert_eq!(result.metadata.len(), CanonicalField::ALL.len());
        assert!(result.metadata.values().all(|v| v == NOT_PROVIDED));
        assert!(result.validations.values().all(|s| *s == FieldStatus::Missing));
        assert!(result.provenance.is_empty());
    }

    #[test]
    fn test_first_fill_wins() {
        let mut record = PartialRecord::new();
        assert!(record.fill(CanonicalField::Ssn, "123-45-6789".to_string(), at_line(0)));
        assert!(!record.fill(CanonicalField::Ssn, "987-65-4321".to_string(), at_line(3)));
        let result = record.finish();
        assert_eq!(result.value(CanonicalField::Ssn), "123-45-6789");
        assert_eq!(result.provenance[&CanonicalField::Ssn], at_line(0));
    }

    #[test]
    fn test_rejection_clears_value_and_blocks_refill() {
        let mut record = PartialRecord::new();
        record.fill(CanonicalField::PhysicianName, "Dr".to_string(), at_line(1));
        record.reject(CanonicalField::PhysicianName, FieldStatus::SuspiciousFormat);
        assert!(!record.fill(CanonicalField::PhysicianName, "Anna K. Lee".to_string(), at_line(2)));
        let result = record.finish();
        assert_eq!(result.value(CanonicalField::PhysicianName), NOT_PROVIDED);
        assert_eq!(result.status(CanonicalField::PhysicianName), FieldStatus::SuspiciousFormat);
        assert!(!result.provenance.contains_key(&CanonicalField::PhysicianName));
    }
}
