use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Placeholder stored for every field extraction could not populate.
pub const NOT_PROVIDED: &str = "[Not provided]";

/// Shape check applied to a candidate before it is accepted for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorKind {
    Date,
    Phone,
    Ssn,
    Mrn,
    Free,
}

/// The closed set of slots in the output metadata record.
///
/// Variant order is output order; `Ord` follows declaration order so the
/// `BTreeMap`s in [`ExtractionResult`] serialize in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    #[serde(rename = "Patient Name")]
    PatientName,
    #[serde(rename = "Date of Birth")]
    DateOfBirth,
    #[serde(rename = "SSN")]
    Ssn,
    #[serde(rename = "MRN")]
    Mrn,
    #[serde(rename = "Delivery/Receipt Date")]
    DeliveryDate,
    #[serde(rename = "Procedure Date")]
    ProcedureDate,
    #[serde(rename = "Procedure")]
    Procedure,
    #[serde(rename = "ITEM CODES")]
    ItemCodes,
    #[serde(rename = "SIDE")]
    Side,
    #[serde(rename = "Diagnosis Code (ICD-10)")]
    DiagnosisCode,
    #[serde(rename = "Physician Name")]
    PhysicianName,
    #[serde(rename = "Patient Address")]
    PatientAddress,
    #[serde(rename = "Patient Phone")]
    PatientPhone,
    #[serde(rename = "Guarantor Name")]
    GuarantorName,
    #[serde(rename = "PRIMARY PAYER")]
    PrimaryPayer,
    #[serde(rename = "Policy Number")]
    PolicyNumber,
    #[serde(rename = "GROUP NUMBER")]
    GroupNumber,
    #[serde(rename = "AUTHORIZATION NUMBER")]
    AuthorizationNumber,
    #[serde(rename = "SECONDARY PAYER")]
    SecondaryPayer,
    #[serde(rename = "Policy Number.1")]
    SecondaryPolicyNumber,
    #[serde(rename = "GROUP NUMBER.1")]
    SecondaryGroupNumber,
    #[serde(rename = "AUTHORIZATION NUMBER.1")]
    SecondaryAuthorizationNumber,
    #[serde(rename = "Relationship to Insured")]
    RelationshipToInsured,
    #[serde(rename = "Surgery Location")]
    SurgeryLocation,
    #[serde(rename = "Employer")]
    Employer,
    #[serde(rename = "Assist Surgeon")]
    AssistSurgeon,
    #[serde(rename = "Components Used")]
    ComponentsUsed,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 27] = [
        CanonicalField::PatientName,
        CanonicalField::DateOfBirth,
        CanonicalField::Ssn,
        CanonicalField::Mrn,
        CanonicalField::DeliveryDate,
        CanonicalField::ProcedureDate,
        CanonicalField::Procedure,
        CanonicalField::ItemCodes,
        CanonicalField::Side,
        CanonicalField::DiagnosisCode,
        CanonicalField::PhysicianName,
        CanonicalField::PatientAddress,
        CanonicalField::PatientPhone,
        CanonicalField::GuarantorName,
        CanonicalField::PrimaryPayer,
        CanonicalField::PolicyNumber,
        CanonicalField::GroupNumber,
        CanonicalField::AuthorizationNumber,
        CanonicalField::SecondaryPayer,
        CanonicalField::SecondaryPolicyNumber,
        CanonicalField::SecondaryGroupNumber,
        CanonicalField::SecondaryAuthorizationNumber,
        CanonicalField::RelationshipToInsured,
        CanonicalField::SurgeryLocation,
        CanonicalField::Employer,
        CanonicalField::AssistSurgeon,
        CanonicalField::ComponentsUsed,
    ];

    /// External key name, as printed on the form and in serialized output.
    pub fn name(&self) -> &'static str {
        match self {
            CanonicalField::PatientName => "Patient Name",
            CanonicalField::DateOfBirth => "Date of Birth",
            CanonicalField::Ssn => "SSN",
            CanonicalField::Mrn => "MRN",
            CanonicalField::DeliveryDate => "Delivery/Receipt Date",
            CanonicalField::ProcedureDate => "Procedure Date",
            CanonicalField::Procedure => "Procedure",
            CanonicalField::ItemCodes => "ITEM CODES",
            CanonicalField::Side => "SIDE",
            CanonicalField::DiagnosisCode => "Diagnosis Code (ICD-10)",
            CanonicalField::PhysicianName => "Physician Name",
            CanonicalField::PatientAddress => "Patient Address",
            CanonicalField::PatientPhone => "Patient Phone",
            CanonicalField::GuarantorName => "Guarantor Name",
            CanonicalField::PrimaryPayer => "PRIMARY PAYER",
            CanonicalField::PolicyNumber => "Policy Number",
            CanonicalField::GroupNumber => "GROUP NUMBER",
            CanonicalField::AuthorizationNumber => "AUTHORIZATION NUMBER",
            CanonicalField::SecondaryPayer => "SECONDARY PAYER",
            CanonicalField::SecondaryPolicyNumber => "Policy Number.1",
            CanonicalField::SecondaryGroupNumber => "GROUP NUMBER.1",
            CanonicalField::SecondaryAuthorizationNumber => "AUTHORIZATION NUMBER.1",
            CanonicalField::RelationshipToInsured => "Relationship to Insured",
            CanonicalField::SurgeryLocation => "Surgery Location",
            CanonicalField::Employer => "Employer",
            CanonicalField::AssistSurgeon => "Assist Surgeon",
            CanonicalField::ComponentsUsed => "Components Used",
        }
    }

    pub fn validator_kind(&self) -> ValidatorKind {
        match self {
            CanonicalField::DateOfBirth
            | CanonicalField::DeliveryDate
            | CanonicalField::ProcedureDate => ValidatorKind::Date,
            CanonicalField::PatientPhone => ValidatorKind::Phone,
            CanonicalField::Ssn => ValidatorKind::Ssn,
            CanonicalField::Mrn => ValidatorKind::Mrn,
            _ => ValidatorKind::Free,
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a value was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// `label: value` pair found by the line scanner
    LabelScan,
    /// Unlabelled pattern match (SSN, MRN)
    PatternScan,
    /// Keyword-gated line search (DOB, home phone, guarantor, components)
    ContextLine,
    /// Date embedded in the source file name
    Filename,
    /// ICD-10 / item codes gathered over the whole document
    CodeCollection,
}

/// A tentative value for a field, proposed before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub field: CanonicalField,
    pub value: String,
    pub line: usize,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub strategy: Strategy,
    /// Line index counted across all pages; `None` for values not read from a line.
    pub line: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldStatus {
    #[serde(rename = "accepted")]
    Accepted,
    #[serde(rename = "rejected: suspicious-format")]
    SuspiciousFormat,
    #[serde(rename = "rejected: too-long")]
    TooLong,
    #[serde(rename = "missing")]
    Missing,
}

impl FieldStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldStatus::Accepted => "accepted",
            FieldStatus::SuspiciousFormat => "rejected: suspicious-format",
            FieldStatus::TooLong => "rejected: too-long",
            FieldStatus::Missing => "missing",
        }
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final record of one extraction. `metadata` and `validations` always hold
/// exactly one entry per [`CanonicalField`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub metadata: BTreeMap<CanonicalField, String>,
    pub validations: BTreeMap<CanonicalField, FieldStatus>,
    pub provenance: BTreeMap<CanonicalField, Provenance>,
}

impl ExtractionResult {
    pub fn value(&self, field: CanonicalField) -> &str {
        self.metadata
            .get(&field)
            .map(String::as_str)
            .unwrap_or(NOT_PROVIDED)
    }

    pub fn status(&self, field: CanonicalField) -> FieldStatus {
        self.validations
            .get(&field)
            .copied()
            .unwrap_or(FieldStatus::Missing)
    }

    pub fn accepted_count(&self) -> usize {
        self.validations
            .values()
            .filter(|status| **status == FieldStatus::Accepted)
            .count()
    }

    /// Single string map with field values plus `__validations__.<Field>` statuses.
    pub fn flatten(&self) -> BTreeMap<String, String> {
        let mut flat = BTreeMap::new();
        for (field, value) in &self.metadata {
            flat.insert(field.name().to_string(), value.clone());
        }
        for (field, status) in &self.validations {
            flat.insert(
                format!("__validations__.{}", field.name()),
                status.as_str().to_string(),
            );
        }
        flat
    }
}
