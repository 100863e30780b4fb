// Shape recognizers for structured values found in intake-form OCR text.
// All are substring searches; none checks a checksum or calendar validity.
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// M/D/Y with `/` or `-`, 2-4 digit year. Groups: month, day, year.
    pub static ref DATE_PATTERN: Regex = Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})\b").unwrap();

    pub static ref PHONE_PATTERN: Regex = Regex::new(r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap();

    // Full or masked (xxx-xx-1234)
    pub static ref SSN_PATTERN: Regex = Regex::new(r"(?i)\b(?:\d{3}-\d{2}-\d{4}|xxx-xx-\d{4})\b").unwrap();

    // No U: that chapter is reserved
    pub static ref ICD10_PATTERN: Regex = Regex::new(r"\b([A-TV-Z][0-9]{2}(?:\.[0-9A-Z]{1,4})?)\b").unwrap();

    /// Group 1 is the record number without its label.
    pub static ref MRN_PATTERN: Regex = Regex::new(r"(?i)\bMRN[:\s]*([A-Z0-9]{5,15})\b").unwrap();

    pub static ref CPT_PATTERN: Regex = Regex::new(r"\b(\d{5})\b").unwrap();

    pub static ref FILENAME_DATE_PATTERN: Regex = Regex::new(r"(\d{8})").unwrap();

    // First M. Last
    pub static ref PERSON_NAME_PATTERN: Regex = Regex::new(r"[A-Z][a-z]+\s+[A-Z]\.?\s+[A-Z][a-z]+").unwrap();
}

pub fn contains_date(text: &str) -> bool {
    DATE_PATTERN.is_match(text)
}

pub fn contains_phone(text: &str) -> bool {
    PHONE_PATTERN.is_match(text)
}

pub fn contains_ssn(text: &str) -> bool {
    SSN_PATTERN.is_match(text)
}

pub fn contains_icd10(text: &str) -> bool {
    ICD10_PATTERN.is_match(text)
}

/// ICD-10 codes in `text`, in order of appearance.
pub fn icd10_codes(text: &str) -> impl Iterator<Item = &str> {
    ICD10_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Five-digit procedure/item codes in `text`, in order of appearance.
pub fn cpt_codes(text: &str) -> impl Iterator<Item = &str> {
    CPT_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

pub fn find_mrn(text: &str) -> Option<&str> {
    MRN_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
