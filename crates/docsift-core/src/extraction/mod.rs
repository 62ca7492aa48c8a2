pub mod pdfinfo;
pub mod pdftoppm;
pub mod pdftotext;

use crate::error::DocsiftError;
use image::DynamicImage;
use std::path::Path;

/// Trait for PDF text-layer extraction backends.
pub trait TextLayerExtractor: Send + Sync {
    /// Number of pages in the document.
    fn page_count(&self, pdf: &Path) -> Result<usize, DocsiftError>;

    /// Selectable text of a single page (0-based index).
    fn extract_page(&self, pdf: &Path, page_index: usize) -> Result<String, DocsiftError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Trait for PDF rasterization backends.
pub trait Rasterizer: Send + Sync {
    /// Render every page at `dpi`, returning one image per page in page order.
    fn rasterize(&self, pdf: &Path, dpi: u32) -> Result<Vec<DynamicImage>, DocsiftError>;

    fn backend_name(&self) -> &str;
}
