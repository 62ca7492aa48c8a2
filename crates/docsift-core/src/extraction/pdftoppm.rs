use crate::error::DocsiftError;
use crate::extraction::{pdfinfo, Rasterizer};
use crate::tool;
use image::DynamicImage;
use rayon::prelude::*;
use std::path::Path;
use std::process::Command;

/// Rasterization backend using pdftoppm (from poppler-utils).
///
/// Pages are rendered one `pdftoppm` call each on a private pool of
/// `threads` workers; the returned images are in page order.
pub struct PdftoppmRasterizer {
    pdftoppm: String,
    pdfinfo: String,
    threads: usize,
}

impl PdftoppmRasterizer {
    pub fn new(threads: usize) -> Self {
        Self::with_tools("pdftoppm", "pdfinfo", threads)
    }

    pub fn with_tools(pdftoppm: &str, pdfinfo: &str, threads: usize) -> Self {
        PdftoppmRasterizer {
            pdftoppm: pdftoppm.to_string(),
            pdfinfo: pdfinfo.to_string(),
            threads: threads.max(1),
        }
    }

    fn command(&self, pdf: &Path, page_number: usize, dpi: u32, out_prefix: &Path) -> Command {
        let page = page_number.to_string();
        let mut cmd = Command::new(&self.pdftoppm);
        cmd.args(["-r", &dpi.to_string(), "-f", &page, "-l", &page])
            .args(["-png", "-singlefile"])
            .arg(pdf)
            .arg(out_prefix);
        cmd
    }

    fn render_page(
        &self,
        pdf: &Path,
        page_number: usize,
        dpi: u32,
    ) -> Result<DynamicImage, DocsiftError> {
        let dir = tempfile::tempdir()?;
        let prefix = dir.path().join("page");
        tool::run(&self.pdftoppm, &mut self.command(pdf, page_number, dpi, &prefix))?;

        // -singlefile writes exactly <prefix>.png
        let image = image::open(prefix.with_extension("png"))?;
        log::debug!(
            "rendered page {} at {} dpi ({}x{})",
            page_number,
            dpi,
            image.width(),
            image.height()
        );
        Ok(image)
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Rasterizer for PdftoppmRasterizer {
    fn rasterize(&self, pdf: &Path, dpi: u32) -> Result<Vec<DynamicImage>, DocsiftError> {
        let pages = pdfinfo::page_count(&self.pdfinfo, pdf)?;
        if pages == 0 {
            return Ok(Vec::new());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| DocsiftError::Rasterize(e.to_string()))?;

        pool.install(|| {
            (1..=pages)
                .into_par_iter()
                .map(|page_number| self.render_page(pdf, page_number, dpi))
                .collect()
        })
    }

    fn backend_name(&self) -> &str {
        "pdftoppm"
    }
}
