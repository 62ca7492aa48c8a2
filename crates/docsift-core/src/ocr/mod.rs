pub mod tesseract;

use crate::error::DocsiftError;
use image::DynamicImage;

/// Trait for OCR backends.
///
/// Implementations are shared across the OCR worker pool, so they must be
/// usable from several threads at once.
pub trait OcrEngine: Send + Sync {
    /// Recognize the text in a single raster image.
    fn recognize(&self, image: &DynamicImage) -> Result<String, DocsiftError>;

    /// Name of this OCR backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
