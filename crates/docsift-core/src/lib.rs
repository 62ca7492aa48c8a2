pub mod classify;
pub mod config;
pub mod document;
pub mod error;
pub mod extraction;
pub mod ocr;
pub mod pipeline;
pub mod preprocess;
pub mod report;
pub mod tool;

use config::ExtractionConfig;
use error::DocsiftError;
use pipeline::Pipeline;
use report::ExtractionReport;
use std::path::Path;

/// Main API entry point: extract the text of a PDF or image file using
/// poppler-utils and tesseract.
///
/// Digital PDFs are read from their text layer, scanned PDFs and images go
/// through OCR. Use [`Pipeline::with_backends`] to supply other backends.
pub fn extract_file(
    path: &Path,
    config: &ExtractionConfig,
) -> Result<ExtractionReport, DocsiftError> {
    config::validate_config(config)?;
    Pipeline::new(config.clone()).extract(path)
}
