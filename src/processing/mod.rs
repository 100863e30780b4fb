pub mod assembler;
pub mod extractors;
pub mod field_correction;
pub mod labels;
pub mod normalizer;
pub mod ocr;
pub mod patterns;
pub mod scanner;

pub use assembler::PartialRecord;
pub use extractors::FallbackExtractor;
pub use field_correction::FieldCorrection;
pub use labels::LabelResolver;
pub use normalizer::clean_text;
pub use ocr::{OcrProvider, PageImage};
pub use scanner::LineScanner;

#[cfg(feature = "tesseract")]
pub use ocr::TesseractOcr;
