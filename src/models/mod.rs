pub mod data;
pub mod rules;

pub use data::{
    Candidate, CanonicalField, ExtractionResult, FieldStatus, Provenance, Strategy,
    ValidatorKind, NOT_PROVIDED,
};
pub use rules::ExtractionRules;
