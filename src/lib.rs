pub mod form_extractor;
pub mod models;
pub mod processing;
pub mod utils;
pub mod validation;

pub use form_extractor::FormExtractor;
pub use models::{CanonicalField, ExtractionResult, ExtractionRules, FieldStatus, NOT_PROVIDED};
pub use utils::FormError;
