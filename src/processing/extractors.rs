// Secondary, field-specific searches for fields the label scan left empty
use crate::models::{CanonicalField, ExtractionRules, Provenance, Strategy};
use crate::processing::assembler::PartialRecord;
use crate::processing::normalizer::clean_text;
use crate::processing::patterns::{self, DATE_PATTERN, FILENAME_DATE_PATTERN, PHONE_PATTERN, SSN_PATTERN};
use crate::validation::{FormatValidator, NoiseFilter};
use chrono::NaiveDate;

const MAX_COLLECTED_CODES: usize = 3;
const MIN_GUARANTOR_WORDS: usize = 2;
const MIN_COMPONENT_WORDS: usize = 5;
// Two-digit years above this are 19xx, the rest 20xx
const CENTURY_PIVOT: u32 = 30;

/// A value found by a fallback, with the line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Found {
    pub value: String,
    pub line: usize,
}

pub struct FallbackExtractor<'a> {
    rules: &'a ExtractionRules,
    noise: NoiseFilter<'a>,
}

impl<'a> FallbackExtractor<'a> {
    pub fn new(rules: &'a ExtractionRules) -> Self {
        FallbackExtractor {
            rules,
            noise: NoiseFilter::new(rules),
        }
    }

    /// Run every fallback whose field is still unset. Never overwrites.
    pub fn fill_gaps(&self, lines: &[String], filename: Option<&str>, record: &mut PartialRecord) {
        let codes = self.scan_document(lines, record);

        if !record.is_set(CanonicalField::DateOfBirth) {
            if let Some(found) = date_of_birth(lines) {
                fill_context(record, CanonicalField::DateOfBirth, found);
            }
        }

        if !record.is_set(CanonicalField::PatientPhone) {
            if let Some(found) = self.patient_phone(lines) {
                fill_context(record, CanonicalField::PatientPhone, found);
            }
        }

        if !record.is_set(CanonicalField::GuarantorName) {
            if let Some(found) = guarantor_name(lines) {
                fill_context(record, CanonicalField::GuarantorName, found);
            }
        }

        if !record.is_set(CanonicalField::DeliveryDate) {
            if let Some(date) = filename.and_then(delivery_date_from_filename) {
                log::debug!("{}: '{}' taken from file name", CanonicalField::DeliveryDate, date);
                record.fill(
                    CanonicalField::DeliveryDate,
                    date,
                    Provenance {
                        strategy: Strategy::Filename,
                        line: None,
                    },
                );
            }
        }

        for (field, collected) in [
            (CanonicalField::DiagnosisCode, &codes.diagnosis),
            (CanonicalField::ItemCodes, &codes.items),
        ] {
            if collected.is_empty() || record.is_set(field) {
                continue;
            }
            let joined = join_codes(collected);
            log::debug!("{}: '{}' collected from document", field, joined);
            record.fill(
                field,
                joined,
                Provenance {
                    strategy: Strategy::CodeCollection,
                    line: None,
                },
            );
        }

        if !record.is_set(CanonicalField::ComponentsUsed) {
            if let Some(found) = self.components_used(lines) {
                fill_context(record, CanonicalField::ComponentsUsed, found);
            }
        }
    }

    // One pass over the whole document: gather codes, and take the first
    // unlabelled SSN / MRN for fields the label scan missed.
    fn scan_document(&self, lines: &[String], record: &mut PartialRecord) -> CollectedCodes {
        let mut codes = CollectedCodes::default();
        for (index, raw) in lines.iter().enumerate() {
            let line = clean_text(raw);
            codes.add_diagnosis(patterns::icd10_codes(&line));
            codes.add_items(patterns::cpt_codes(&line));

            if !record.is_set(CanonicalField::Ssn) {
                if let Some(m) = SSN_PATTERN.find(&line) {
                    fill_pattern(record, CanonicalField::Ssn, m.as_str(), index);
                }
            }
            if !record.is_set(CanonicalField::Mrn) {
                if let Some(mrn) = patterns::find_mrn(&line) {
                    fill_pattern(record, CanonicalField::Mrn, mrn, index);
                }
            }
        }
        codes
    }

    /// First phone on a "home phone" / "hm ph" line that is not the clinic's number.
    pub fn patient_phone(&self, lines: &[String]) -> Option<Found> {
        lines.iter().enumerate().find_map(|(index, line)| {
            let lower = line.to_lowercase();
            if !(lower.contains("home phone") || lower.contains("hm ph")) {
                return None;
            }
            let phone = PHONE_PATTERN.find(line)?.as_str();
            if self.noise.is_clinic_number(phone) {
                log::debug!("line {}: skipping clinic number {}", index, phone);
                return None;
            }
            Some(Found {
                value: phone.to_string(),
                line: index,
            })
        })
    }

    /// First line naming an implant component that reads like a description.
    pub fn components_used(&self, lines: &[String]) -> Option<Found> {
        lines.iter().enumerate().find_map(|(index, line)| {
            let lower = line.to_lowercase();
            let mentions_component = self
                .rules
                .component_keywords
                .iter()
                .any(|keyword| lower.contains(&keyword.to_lowercase()));
            if !mentions_component {
                return None;
            }
            let cleaned = clean_text(line);
            (cleaned.split_whitespace().count() >= MIN_COMPONENT_WORDS).then(|| Found {
                value: cleaned,
                line: index,
            })
        })
    }
}

/// First date on a line mentioning "dob" or "date of birth", with two-digit
/// years expanded.
pub fn date_of_birth(lines: &[String]) -> Option<Found> {
    lines.iter().enumerate().find_map(|(index, line)| {
        let lower = line.to_lowercase();
        if !(lower.contains("dob") || lower.contains("date of birth")) {
            return None;
        }
        let caps = DATE_PATTERN.captures(line)?;
        Some(Found {
            value: format!("{}/{}/{}", &caps[1], &caps[2], expand_year(&caps[3])),
            line: index,
        })
    })
}

/// Text after the first colon of the first "guarantor" line, if it has at least two words.
pub fn guarantor_name(lines: &[String]) -> Option<Found> {
    lines.iter().enumerate().find_map(|(index, line)| {
        if !line.to_lowercase().contains("guarantor") {
            return None;
        }
        let name = line.split(':').nth(1)?.trim();
        (name.split_whitespace().count() >= MIN_GUARANTOR_WORDS).then(|| Found {
            value: name.to_string(),
            line: index,
        })
    })
}

/// First 8-digit run of a file name read as MMDDYYYY, reformatted as MM/DD/YYYY.
pub fn delivery_date_from_filename(filename: &str) -> Option<String> {
    let digits = FILENAME_DATE_PATTERN.find(filename)?.as_str();
    match NaiveDate::parse_from_str(digits, "%m%d%Y") {
        Ok(date) => Some(date.format("%m/%d/%Y").to_string()),
        Err(e) => {
            log::warn!("file name '{}': '{}' is not an MMDDYYYY date: {}", filename, digits, e);
            None
        }
    }
}

pub fn expand_year(year: &str) -> String {
    if year.len() != 2 {
        return year.to_string();
    }
    match year.parse::<u32>() {
        Ok(yy) if yy > CENTURY_PIVOT => format!("19{}", year),
        _ => format!("20{}", year),
    }
}

/// Codes in first-occurrence order, without duplicates.
#[derive(Debug, Default)]
struct CollectedCodes {
    diagnosis: Vec<String>,
    items: Vec<String>,
}

impl CollectedCodes {
    fn add_diagnosis<'t>(&mut self, codes: impl Iterator<Item = &'t str>) {
        push_unique(&mut self.diagnosis, codes);
    }

    fn add_items<'t>(&mut self, codes: impl Iterator<Item = &'t str>) {
        push_unique(&mut self.items, codes);
    }
}

fn push_unique<'t>(seen: &mut Vec<String>, codes: impl Iterator<Item = &'t str>) {
    for code in codes {
        if !seen.iter().any(|c| c == code) {
            seen.push(code.to_string());
        }
    }
}

fn join_codes(codes: &[String]) -> String {
    codes
        .iter()
        .take(MAX_COLLECTED_CODES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn fill_pattern(record: &mut PartialRecord, field: CanonicalField, value: &str, line: usize) {
    log::debug!("{}: '{}' matched on line {}", field, value, line);
    record.fill(
        field,
        value.to_string(),
        Provenance {
            strategy: Strategy::PatternScan,
            line: Some(line),
        },
    );
}

fn fill_context(record: &mut PartialRecord, field: CanonicalField, found: Found) {
    if !FormatValidator::is_valid(field, &found.value) {
        log::debug!("{}: '{}' near keyword on line {} failed format checks", field, found.value, found.line);
        return;
    }
    log::debug!("{}: '{}' found near keyword on line {}", field, found.value, found.line);
    record.fill(
        field,
        found.value,
        Provenance {
            strategy: Strategy::ContextLine,
            line: Some(found.line),
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NOT_PROVIDED;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(String::from).collect()
    }

    #[test]
    fn test_two_digit_years() {
        assert_eq!(expand_year("85"), "1985");
        assert_eq!(expand_year("12"), "2012");
        assert_eq!(expand_year("30"), "2030");
        assert_eq!(expand_year("31"), "1931");
        assert_eq!(expand_year("1985"), "1985");
    }

    #[test]
    fn test_dob_from_context_line() {
        let text = lines("Admit 01/05/2024\nPt DOB 3/4/85 Sex F");
        assert_eq!(
            date_of_birth(&text),
            Some(Found {
                value: "3/4/1985".to_string(),
                line: 1
            })
        );
        let text = lines("Date of Birth 11-20-12");
        assert_eq!(date_of_birth(&text).unwrap().value, "11/20/2012");
        assert_eq!(date_of_birth(&lines("DOB unknown")), None);
    }

    #[test]
    fn test_guarantor_needs_two_words() {
        let text = lines("Guarantor: Self\nGUARANTOR: Mary Ann Public\n");
        assert_eq!(
            guarantor_name(&text),
            Some(Found {
                value: "Mary Ann Public".to_string(),
                line: 1
            })
        );
    }

    #[test]
    fn test_filename_dates() {
        assert_eq!(
            delivery_date_from_filename("04242025_form.pdf"),
            Some("04/24/2025".to_string())
        );
        assert_eq!(
            delivery_date_from_filename("04242025 NIANEQUA CIARA BRACKEN PPA.pdf"),
            Some("04/24/2025".to_string())
        );
        assert_eq!(delivery_date_from_filename("13402025_form.pdf"), None);
        assert_eq!(delivery_date_from_filename("scan.pdf"), None);
    }

    #[test]
    fn test_home_phone_skips_clinic_number() {
        let rules = ExtractionRules::default();
        let extractor = FallbackExtractor::new(&rules);
        let text = lines("Home Phone 214-645-3300\nHm Ph (972) 555-0142");
        assert_eq!(
            extractor.patient_phone(&text),
            Some(Found {
                value: "(972) 555-0142".to_string(),
                line: 1
            })
        );
        assert_eq!(extractor.patient_phone(&lines("Home Phone 214-645-3300")), None);
    }

    #[test]
    fn test_components_need_a_descriptive_line() {
        let rules = ExtractionRules::default();
        let extractor = FallbackExtractor::new(&rules);
        let text = lines("Zimmer\nImplant: Zimmer Persona CR femur size 9 *left*");
        assert_eq!(
            extractor.components_used(&text),
            Some(Found {
                value: "Implant: Zimmer Persona CR femur size 9 left".to_string(),
                line: 1
            })
        );
    }

    #[test]
    fn test_codes_are_collected_in_first_seen_order() {
        let rules = ExtractionRules::default();
        let extractor = FallbackExtractor::new(&rules);
        let text = lines("Dx M17.11 Z96.651\nCPT 27447 27447\nM17.11 M25.561 R26.89\n27486 99213 20610");
        let mut record = PartialRecord::new();
        extractor.fill_gaps(&text, None, &mut record);
        let result = record.finish();
        assert_eq!(result.value(CanonicalField::DiagnosisCode), "M17.11, Z96.651, M25.561");
        assert_eq!(result.value(CanonicalField::ItemCodes), "27447, 27486, 99213");
    }

    #[test]
    fn test_unlabelled_ssn_and_mrn() {
        let rules = ExtractionRules::default();
        let extractor = FallbackExtractor::new(&rules);
        let text = lines("ID 123-45-6789\nMRN 00A991234\nalso 987-65-4321");
        let mut record = PartialRecord::new();
        extractor.fill_gaps(&text, None, &mut record);
        let result = record.finish();
        assert_eq!(result.value(CanonicalField::Ssn), "123-45-6789");
        assert_eq!(result.value(CanonicalField::Mrn), "00A991234");
        assert_eq!(result.provenance[&CanonicalField::Mrn].line, Some(1));
        assert_eq!(result.value(CanonicalField::Procedure), NOT_PROVIDED);
    }

    #[test]
    fn test_filled_fields_are_not_overwritten() {
        let rules = ExtractionRules::default();
        let extractor = FallbackExtractor::new(&rules);
        let mut record = PartialRecord::new();
        record.fill(
            CanonicalField::DeliveryDate,
            "05/01/2025".to_string(),
            Provenance {
                strategy: Strategy::LabelScan,
                line: Some(0),
            },
        );
        extractor.fill_gaps(&lines("nothing useful"), Some("04242025_form.pdf"), &mut record);
        assert_eq!(record.get(CanonicalField::DeliveryDate), Some("05/01/2025"));
    }

    #[test]
    fn test_context_values_are_format_checked() {
        let rules = ExtractionRules::default();
        let extractor = FallbackExtractor::new(&rules);
        let long_name = format!("Guarantor: {}", "Bracken ".repeat(25));
        let mut record = PartialRecord::new();
        extractor.fill_gaps(&lines(&long_name), None, &mut record);
        assert!(!record.is_set(CanonicalField::GuarantorName));
    }
}
