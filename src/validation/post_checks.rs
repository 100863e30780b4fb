use crate::models::{CanonicalField, FieldStatus};
use crate::processing::assembler::PartialRecord;
use crate::processing::patterns::PERSON_NAME_PATTERN;

const MIN_PHYSICIAN_CHARS: usize = 5;
const MAX_POLICY_WORDS: usize = 5;

/// Checks run once over the assembled record, after every extraction pass.
pub struct PostValidator;

impl PostValidator {
    pub fn apply(record: &mut PartialRecord) {
        if let Some(name) = record.get(CanonicalField::PhysicianName) {
            if Self::is_suspicious_physician(name) {
                record.reject(CanonicalField::PhysicianName, FieldStatus::SuspiciousFormat);
            }
        }

        for field in [CanonicalField::PolicyNumber, CanonicalField::SecondaryPolicyNumber] {
            if let Some(policy) = record.get(field) {
                if policy.split_whitespace().count() > MAX_POLICY_WORDS {
                    record.reject(field, FieldStatus::TooLong);
                }
            }
        }
    }

    /// Not shaped like "First M. Last" and too short to be a name.
    pub fn is_suspicious_physician(name: &str) -> bool {
        !PERSON_NAME_PATTERN.is_match(name) && name.chars().count() < MIN_PHYSICIAN_CHARS
    }
}
