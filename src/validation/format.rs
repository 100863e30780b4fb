use crate::models::{CanonicalField, ValidatorKind};
use crate::processing::patterns;

pub const MIN_VALUE_CHARS: usize = 2;
pub const MAX_VALUE_CHARS: usize = 150;

/// Why a candidate was turned away by [`FormatValidator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatIssue {
    TooShort,
    TooLong,
    NoDate,
    NoPhone,
    NoSsn,
    NotAlphanumeric,
}

impl FormatIssue {
    pub fn message(&self) -> &'static str {
        match self {
            FormatIssue::TooShort => "shorter than 2 characters",
            FormatIssue::TooLong => "longer than 150 characters",
            FormatIssue::NoDate => "no date found",
            FormatIssue::NoPhone => "no phone number found",
            FormatIssue::NoSsn => "no SSN found",
            FormatIssue::NotAlphanumeric => "not alphanumeric",
        }
    }
}

pub struct FormatValidator;

impl FormatValidator {
    /// Shape check for a candidate value, driven by the field's validator kind.
    pub fn validate(field: CanonicalField, value: &str) -> Result<(), FormatIssue> {
        let value = value.trim();
        let chars = value.chars().count();
        if chars < MIN_VALUE_CHARS {
            return Err(FormatIssue::TooShort);
        }
        if chars > MAX_VALUE_CHARS {
            return Err(FormatIssue::TooLong);
        }

        match field.validator_kind() {
            ValidatorKind::Date if !patterns::contains_date(value) => Err(FormatIssue::NoDate),
            ValidatorKind::Phone if !patterns::contains_phone(value) => Err(FormatIssue::NoPhone),
            ValidatorKind::Ssn if !patterns::contains_ssn(value) => Err(FormatIssue::NoSsn),
            ValidatorKind::Mrn if !value.chars().all(char::is_alphanumeric) => {
                Err(FormatIssue::NotAlphanumeric)
            }
            _ => Ok(()),
        }
    }

    pub fn is_valid(field: CanonicalField, value: &str) -> bool {
        Self::validate(field, value).is_ok()
    }
}
