pub mod error;

pub use error::{FormError, OcrError};
