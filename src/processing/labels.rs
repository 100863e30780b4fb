use crate::models::{CanonicalField, ExtractionRules};

const MIN_PARTIAL_LABEL_CHARS: usize = 3;

/// Maps observed form labels ("Hm Phone", "Doctor") to canonical fields.
///
/// Lookup keys are the lowercase canonical names in field order, followed by
/// the rule aliases in sorted order. That order only breaks ties.
#[derive(Debug, Clone)]
pub struct LabelResolver {
    keys: Vec<(String, CanonicalField)>,
}

impl LabelResolver {
    pub fn new(rules: &ExtractionRules) -> Self {
        let mut keys: Vec<(String, CanonicalField)> = CanonicalField::ALL
            .iter()
            .map(|field| (field.name().to_lowercase(), *field))
            .collect();
        for (alias, field) in &rules.aliases {
            keys.push((alias.to_lowercase(), *field));
        }
        LabelResolver { keys }
    }

    /// Exact canonical name, then exact alias, then the closest substring match.
    pub fn resolve(&self, label: &str) -> Option<CanonicalField> {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return None;
        }
        self.resolve_exact(&label)
            .or_else(|| self.resolve_substring(&label))
    }

    /// Exact match only, against canonical names or aliases.
    pub fn resolve_exact(&self, label: &str) -> Option<CanonicalField> {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return None;
        }
        // Canonical names come first in `keys`, so they win over an identical alias
        self.keys
            .iter()
            .find(|(key, _)| *key == label)
            .map(|(_, field)| *field)
    }

    /// Every lookup key with its field, in tie-break order.
    pub fn labels(&self) -> impl Iterator<Item = (&str, CanonicalField)> + '_ {
        self.keys.iter().map(|(key, field)| (key.as_str(), *field))
    }

    // Substring containment in either direction. The key whose length is
    // closest to the label's wins; ties go to the earlier key. A label found
    // inside a key needs MIN_PARTIAL_LABEL_CHARS ("dr" sits inside "address").
    fn resolve_substring(&self, label: &str) -> Option<CanonicalField> {
        let mut best: Option<(f64, CanonicalField)> = None;
        let label_chars = label.chars().count();
        for (key, field) in &self.keys {
            let label_in_key = label_chars >= MIN_PARTIAL_LABEL_CHARS && key.contains(label);
            if !(label_in_key || label.contains(key.as_str())) {
                continue;
            }
            let (short, long) = if key.len() < label.len() {
                (key.len(), label.len())
            } else {
                (label.len(), key.len())
            };
            let closeness = short as f64 / long as f64;
            match best {
                Some((score, _)) if score >= closeness => {}
                _ => best = Some((closeness, *field)),
            }
        }
        best.map(|(_, field)| field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> LabelResolver {
        LabelResolver::new(&ExtractionRules::default())
    }

    #[test]
    fn test_exact_canonical_match_ignores_case() {
        let r = resolver();
        assert_eq!(r.resolve("PATIENT NAME"), Some(CanonicalField::PatientName));
        assert_eq!(r.resolve(" primary payer "), Some(CanonicalField::PrimaryPayer));
        assert_eq!(r.resolve("Policy Number.1"), Some(CanonicalField::SecondaryPolicyNumber));
    }

    #[test]
    fn test_alias_match() {
        let r = resolver();
        assert_eq!(r.resolve("Hm Ph"), Some(CanonicalField::PatientPhone));
        assert_eq!(r.resolve("Doctor"), Some(CanonicalField::PhysicianName));
        assert_eq!(r.resolve("Guarantor"), Some(CanonicalField::GuarantorName));
    }

    #[test]
    fn test_substring_prefers_closest_length() {
        let r = resolver();
        // "patient" is inside patient name/address/phone; name is the tightest fit
        assert_eq!(r.resolve("Patient"), Some(CanonicalField::PatientName));
        assert_eq!(r.resolve("Physician"), Some(CanonicalField::PhysicianName));
        // contains both "primary payer" and the "name" alias
        assert_eq!(r.resolve("Primary Payer Name"), Some(CanonicalField::PrimaryPayer));
        assert_eq!(r.resolve("Home Phone Number"), Some(CanonicalField::PatientPhone));
        assert_eq!(r.resolve("Referring Surgeon"), Some(CanonicalField::PhysicianName));
    }

    #[test]
    fn test_unmatched_and_empty_labels() {
        let r = resolver();
        assert_eq!(r.resolve("DOB"), None);
        assert_eq!(r.resolve("Favourite colour"), None);
        assert_eq!(r.resolve(""), None);
        assert_eq!(r.resolve("   "), None);
    }

    #[test]
    fn test_short_labels_do_not_match_inside_keys() {
        let r = resolver();
        assert_eq!(r.resolve("Dr"), None);
        assert_eq!(r.resolve("ss"), None);
        assert_eq!(r.resolve("Employ"), Some(CanonicalField::Employer));
    }

    #[test]
    fn test_labels_lists_canonical_names_first() {
        let r = resolver();
        let first = r.labels().next();
        assert_eq!(first, Some(("patient name", CanonicalField::PatientName)));
        assert!(r.labels().any(|(key, field)| key == "address" && field == CanonicalField::PatientAddress));
    }

    #[test]
    fn test_exact_only_lookup() {
        let r = resolver();
        assert_eq!(r.resolve_exact("surgeon"), Some(CanonicalField::PhysicianName));
        assert_eq!(r.resolve_exact("Referring Surgeon"), None);
    }
}
