use crate::models::{Candidate, ExtractionResult, ExtractionRules, Provenance};
use crate::processing::{
    FallbackExtractor, FieldCorrection, LabelResolver, LineScanner, OcrProvider, PageImage,
    PartialRecord,
};
use crate::utils::FormError;
use crate::validation::{FormatValidator, NoiseFilter, PostValidator};

/// Turns the OCR text of one scanned form into a complete metadata record.
///
/// Holds only read-only tables, so one extractor can serve concurrent
/// extractions by shared reference.
pub struct FormExtractor {
    rules: ExtractionRules,
    resolver: LabelResolver,
}

impl FormExtractor {
    pub fn new() -> Self {
        Self::from_normalized(ExtractionRules::default())
    }

    pub fn with_rules(rules: ExtractionRules) -> Result<Self, FormError> {
        Ok(Self::from_normalized(rules.normalized()?))
    }

    fn from_normalized(rules: ExtractionRules) -> Self {
        let resolver = LabelResolver::new(&rules);
        FormExtractor { rules, resolver }
    }

    pub fn rules(&self) -> &ExtractionRules {
        &self.rules
    }

    /// Extract metadata from page texts in page order. `filename` is only
    /// consulted for the delivery date fallback.
    pub fn extract<S: AsRef<str>>(&self, pages: &[S], filename: Option<&str>) -> ExtractionResult {
        let lines: Vec<String> = pages
            .iter()
            .flat_map(|page| page.as_ref().lines())
            .map(String::from)
            .collect();
        log::debug!("extracting from {} pages, {} lines", pages.len(), lines.len());

        let mut record = PartialRecord::new();
        let scanner = LineScanner::new(&self.resolver);

        // Step 1: label scan, first valid candidate per field wins
        self.accept(scanner.scan(&lines), &mut record);

        // Step 2: fallbacks for whatever is still empty
        FallbackExtractor::new(&self.rules).fill_gaps(&lines, filename, &mut record);

        // Step 3: labels printed without a colon, or with the value below them
        self.accept(scanner.scan_leading_labels(&lines), &mut record);

        // Step 4: downgrade suspicious values, then close over the field set
        PostValidator::apply(&mut record);
        record.finish()
    }

    // Correct, filter and validate candidates in order; only unset fields are filled.
    fn accept(&self, candidates: Vec<Candidate>, record: &mut PartialRecord) {
        let correction = FieldCorrection::new(&self.rules);
        let noise = NoiseFilter::new(&self.rules);
        for candidate in candidates {
            let field = candidate.field;
            let value = correction.correct(field, candidate.value);

            if let Err(issue) = noise.check(field, &value) {
                log::debug!("{}: dropped '{}' on line {} ({})", field, value, candidate.line, issue.message());
                continue;
            }
            if record.is_set(field) {
                continue;
            }
            if let Err(issue) = FormatValidator::validate(field, &value) {
                log::debug!("{}: rejected '{}' on line {} ({})", field, value, candidate.line, issue.message());
                continue;
            }
            record.fill(
                field,
                value,
                Provenance {
                    strategy: candidate.strategy,
                    line: Some(candidate.line),
                },
            );
        }
    }

    /// OCR every page with `provider`, then extract. Any provider failure
    /// aborts the whole request.
    pub fn extract_from_images<P: OcrProvider + ?Sized>(
        &self,
        provider: &P,
        pages: &[PageImage],
        filename: Option<&str>,
    ) -> Result<ExtractionResult, FormError> {
        if pages.is_empty() {
            return Err(FormError::NoPages);
        }
        let mut texts = Vec::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            let text = provider
                .recognize(page)
                .map_err(|source| FormError::Ocr {
                    page: index + 1,
                    source,
                })?;
            if text.trim().is_empty() {
                log::warn!("page {}: OCR found no text", index + 1);
            }
            texts.push(text);
        }
        Ok(self.extract(&texts, filename))
    }
}

impl Default for FormExtractor {
    fn default() -> Self {
        Self::new()
    }
}
