use crate::utils::OcrError;
use image::DynamicImage;

pub const DEFAULT_DPI: u32 = 300;

/// One rendered page handed to an OCR provider.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub image: DynamicImage,
    pub dpi: u32,
}

impl PageImage {
    pub fn new(image: DynamicImage) -> Self {
        PageImage {
            image,
            dpi: DEFAULT_DPI,
        }
    }

    pub fn with_dpi(image: DynamicImage, dpi: u32) -> Self {
        PageImage { image, dpi }
    }
}

/// Converts a page image to raw text. An empty string means no text was found.
pub trait OcrProvider {
    fn recognize(&self, page: &PageImage) -> Result<String, OcrError>;
}

#[cfg(feature = "tesseract")]
pub use self::tesseract_provider::TesseractOcr;

#[cfg(feature = "tesseract")]
mod tesseract_provider {
    use super::{OcrProvider, PageImage};
    use crate::utils::OcrError;
    use image::ImageFormat;
    use tesseract::Tesseract;

    /// OCR through the system Tesseract library.
    pub struct TesseractOcr {
        language: String,
        datapath: Option<String>,
    }

    impl TesseractOcr {
        pub fn new(language: &str) -> Self {
            TesseractOcr {
                language: language.to_string(),
                datapath: None,
            }
        }

        pub fn with_datapath(mut self, datapath: &str) -> Self {
            self.datapath = Some(datapath.to_string());
            self
        }
    }

    impl Default for TesseractOcr {
        fn default() -> Self {
            Self::new("eng")
        }
    }

    impl OcrProvider for TesseractOcr {
        fn recognize(&self, page: &PageImage) -> Result<String, OcrError> {
            // Tesseract reads from a path, so stage the page as a PNG
            let temp_file = tempfile::Builder::new()
                .suffix(".png")
                .tempfile()
                .map_err(|e| OcrError::Image(format!("Failed to create temp file: {}", e)))?;
            page.image
                .save_with_format(temp_file.path(), ImageFormat::Png)
                .map_err(|e| OcrError::Image(format!("Failed to write page image: {}", e)))?;

            let path_str = temp_file
                .path()
                .to_str()
                .ok_or_else(|| OcrError::Image("Failed to convert path to string".to_string()))?;

            let text = Tesseract::new(self.datapath.as_deref(), Some(&self.language))
                .map_err(|e| OcrError::Initialization(e.to_string()))?
                .set_image(path_str)
                .map_err(|e| OcrError::Image(e.to_string()))?
                .set_source_resolution(page.dpi as i32)
                .get_text()
                .map_err(|e| OcrError::Recognition(e.to_string()))?;

            log::debug!("tesseract returned {} characters", text.len());
            Ok(text)
        }
    }
}
