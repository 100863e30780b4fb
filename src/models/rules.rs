use crate::models::CanonicalField;
use crate::utils::FormError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Static lookup tables driving extraction.
///
/// Built once (defaults or a JSON file), then only read. A single instance is
/// shared by every extraction the owning `FormExtractor` runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionRules {
    /// Lowercase observed label variant -> canonical field
    pub aliases: BTreeMap<String, CanonicalField>,
    /// Lowercase OCR misspelling -> corrected physician name
    pub physician_corrections: BTreeMap<String, String>,
    /// Front-desk numbers that are never the patient's own phone
    pub clinic_numbers: Vec<String>,
    /// Implant/component vocabulary for the Components Used line search
    pub component_keywords: Vec<String>,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        let aliases = [
            ("home phone", CanonicalField::PatientPhone),
            ("hm ph", CanonicalField::PatientPhone),
            ("home #", CanonicalField::PatientPhone),
            ("telephone", CanonicalField::PatientPhone),
            ("guarantor", CanonicalField::GuarantorName),
            ("doctor", CanonicalField::PhysicianName),
            ("provider", CanonicalField::PhysicianName),
            ("surgeon", CanonicalField::PhysicianName),
            ("name", CanonicalField::PatientName),
            ("address", CanonicalField::PatientAddress),
        ]
        .into_iter()
        .map(|(alias, field)| (alias.to_string(), field))
        .collect();

        let physician_corrections = [
            ("steve tiskiles", "Steven Skules"),
            ("steven skules", "Steven Skules"),
            ("dr skules", "Steven Skules"),
            ("steven skukes", "Steven Skules"),
        ]
        .into_iter()
        .map(|(wrong, right)| (wrong.to_string(), right.to_string()))
        .collect();

        let component_keywords = [
            "Zimmer", "femur", "insert", "tibia", "Persona", "component", "baseplate", "augments",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        ExtractionRules {
            aliases,
            physician_corrections,
            clinic_numbers: vec!["214-645-3300".to_string()],
            component_keywords,
        }
    }
}

impl ExtractionRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load rules from a JSON file. Sections missing from the file keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, FormError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, FormError> {
        let rules: ExtractionRules = serde_json::from_str(raw)
            .map_err(|e| FormError::Rules(format!("Failed to parse rules: {}", e)))?;
        rules.normalized()
    }

    /// Lowercase and trim lookup keys, rejecting entries that can never match.
    pub fn normalized(self) -> Result<Self, FormError> {
        let mut aliases = BTreeMap::new();
        for (alias, field) in self.aliases {
            let key = alias.trim().to_lowercase();
            if key.is_empty() {
                return Err(FormError::Rules(format!("Empty alias for field {}", field)));
            }
            if let Some(previous) = aliases.insert(key.clone(), field) {
                if previous != field {
                    return Err(FormError::Rules(format!(
                        "Alias '{}' maps to both {} and {}",
                        key, previous, field
                    )));
                }
            }
        }

        let mut physician_corrections = BTreeMap::new();
        for (wrong, right) in self.physician_corrections {
            let key = wrong.trim().to_lowercase();
            if key.is_empty() {
                return Err(FormError::Rules(format!("Empty misspelling for '{}'", right)));
            }
            physician_corrections.insert(key, right.trim().to_string());
        }

        let clinic_numbers: Vec<String> = self
            .clinic_numbers
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| n.chars().any(|c| c.is_ascii_digit()))
            .collect();

        let component_keywords = self
            .component_keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Ok(ExtractionRules {
            aliases,
            physician_corrections,
            clinic_numbers,
            component_keywords,
        })
    }
}
