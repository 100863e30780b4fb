// Command-line front end: OCR text (or page images) in, metadata JSON out

use clap::Parser;
use medform::{
    models::{ExtractionResult, ExtractionRules},
    utils::FormError,
    FormExtractor,
};
use std::path::PathBuf;

/// Extract patient, insurance and physician metadata from scanned form OCR text.
#[derive(Debug, Parser)]
#[clap(version, after_help = "Set RUST_LOG=debug to see why candidates were rejected.")]
struct Opts {
    /// Page files in page order (OCR text, or images with --images)
    #[clap(required = true)]
    pages: Vec<PathBuf>,

    /// JSON file overriding the built-in alias and correction tables
    #[clap(long, env = "MEDFORM_RULES")]
    rules: Option<PathBuf>,

    /// Source document file name, used for the delivery date fallback
    /// (defaults to the first page's file name)
    #[clap(long)]
    source_name: Option<String>,

    /// Treat pages as images and OCR them with Tesseract
    #[clap(long)]
    images: bool,

    /// Rendering resolution of the page images
    #[clap(long, default_value_t = 300)]
    dpi: u32,

    /// Tesseract language
    #[clap(long, default_value = "eng")]
    lang: String,

    /// Print a single flat map with `__validations__.<Field>` entries
    #[clap(long)]
    flat: bool,

    /// Print a human-readable report instead of JSON
    #[clap(long, conflicts_with = "flat")]
    report: bool,

    /// Pretty-print JSON output
    #[clap(long)]
    pretty: bool,
}

fn print_report(extractor: &FormExtractor, result: &ExtractionResult) {
    let rules = extractor.rules();
    println!("\n===============================================");
    println!("          FORM METADATA EXTRACTION");
    println!("===============================================\n");
    println!(
        "  Rules: {} aliases, {} physician corrections, {} clinic numbers, {} component keywords\n",
        rules.aliases.len(),
        rules.physician_corrections.len(),
        rules.clinic_numbers.len(),
        rules.component_keywords.len()
    );

    for (field, value) in &result.metadata {
        println!("  {:<26} {:<40} [{}]", field.name(), value, result.status(*field));
    }

    println!(
        "\n{} of {} fields extracted",
        result.accepted_count(),
        result.metadata.len()
    );
}

fn read_text_pages(paths: &[PathBuf]) -> Result<Vec<String>, FormError> {
    paths
        .iter()
        .map(|path| std::fs::read_to_string(path).map_err(FormError::from))
        .collect()
}

#[cfg(feature = "tesseract")]
fn ocr_pages(extractor: &FormExtractor, opts: &Opts, filename: Option<&str>) -> Result<ExtractionResult, FormError> {
    use medform::processing::{PageImage, TesseractOcr};

    let mut pages = Vec::with_capacity(opts.pages.len());
    for path in &opts.pages {
        let image = image::open(path).map_err(|e| {
            FormError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Failed to open image {}: {}", path.display(), e),
            ))
        })?;
        pages.push(PageImage::with_dpi(image, opts.dpi));
    }
    let mut provider = TesseractOcr::new(&opts.lang);
    if let Ok(datapath) = std::env::var("TESSDATA_PREFIX") {
        provider = provider.with_datapath(&datapath);
    }
    extractor.extract_from_images(&provider, &pages, filename)
}

#[cfg(not(feature = "tesseract"))]
fn ocr_pages(_extractor: &FormExtractor, _opts: &Opts, _filename: Option<&str>) -> Result<ExtractionResult, FormError> {
    Err(FormError::Unsupported(
        "--images needs a build with the `tesseract` feature".to_string(),
    ))
}

fn main() -> Result<(), FormError> {
    env_logger::init();
    let opts = Opts::parse();

    let extractor = match &opts.rules {
        Some(path) => {
            log::info!("loading extraction rules from {}", path.display());
            FormExtractor::with_rules(ExtractionRules::from_json_file(path)?)?
        }
        None => FormExtractor::new(),
    };

    let filename = opts.source_name.clone().or_else(|| {
        opts.pages
            .first()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    });

    let result = if opts.images {
        ocr_pages(&extractor, &opts, filename.as_deref())?
    } else {
        let texts = read_text_pages(&opts.pages)?;
        extractor.extract(&texts, filename.as_deref())
    };

    if opts.report {
        print_report(&extractor, &result);
        return Ok(());
    }

    let output = if opts.flat {
        serde_json::to_value(result.flatten())?
    } else {
        serde_json::to_value(&result)?
    };
    let rendered = if opts.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);
    Ok(())
}
