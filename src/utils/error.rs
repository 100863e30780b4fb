use thiserror::Error;

/// Failure reported by an OCR provider for a single page.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR engine initialization failed: {0}")]
    Initialization(String),
    #[error("Failed to hand page image to OCR engine: {0}")]
    Image(String),
    #[error("OCR engine failed to recognize text: {0}")]
    Recognition(String),
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid extraction rules: {0}")]
    Rules(String),
    #[error("OCR failed on page {page}: {source}")]
    Ocr {
        page: usize,
        #[source]
        source: OcrError,
    },
    #[error("No pages supplied for extraction")]
    NoPages,
    #[error("Unsupported: {0}")]
    Unsupported(String),
}
