use crate::classify::{Classifier, DocumentClass};
use crate::config::ExtractionConfig;
use crate::document::{Document, DocumentKind};
use crate::error::DocsiftError;
use crate::extraction::pdftoppm::PdftoppmRasterizer;
use crate::extraction::pdftotext::PdftotextExtractor;
use crate::extraction::{Rasterizer, TextLayerExtractor};
use crate::ocr::tesseract::TesseractEngine;
use crate::ocr::OcrEngine;
use crate::preprocess::Denoiser;
use crate::report::{ExtractionMethod, ExtractionReport, PageResult};
use image::DynamicImage;
use rayon::prelude::*;
use std::path::Path;

/// Routes one input file through the right extraction path.
pub struct Pipeline {
    config: ExtractionConfig,
    text_layer: Box<dyn TextLayerExtractor>,
    rasterizer: Box<dyn Rasterizer>,
    ocr: Box<dyn OcrEngine>,
    classifier: Classifier,
    denoiser: Denoiser,
}

impl Pipeline {
    /// Pipeline backed by poppler-utils and tesseract, as named in `config.tools`.
    pub fn new(config: ExtractionConfig) -> Self {
        let tools = &config.tools;
        let text_layer = PdftotextExtractor::with_tools(&tools.pdftotext, &tools.pdfinfo);
        let rasterizer =
            PdftoppmRasterizer::with_tools(&tools.pdftoppm, &tools.pdfinfo, config.raster_threads);
        let ocr = TesseractEngine::with_tool(&tools.tesseract, config.ocr.clone());
        Self::with_backends(
            config,
            Box::new(text_layer),
            Box::new(rasterizer),
            Box::new(ocr),
        )
    }

    pub fn with_backends(
        config: ExtractionConfig,
        text_layer: Box<dyn TextLayerExtractor>,
        rasterizer: Box<dyn Rasterizer>,
        ocr: Box<dyn OcrEngine>,
    ) -> Self {
        Pipeline {
            classifier: Classifier::new(config.scan_threshold),
            denoiser: Denoiser::new(config.denoise.clone()),
            config,
            text_layer,
            rasterizer,
            ocr,
        }
    }

    /// Classify a PDF without extracting it. Images are never classified and
    /// yield `None`.
    pub fn classify(&self, path: &Path) -> Result<Option<DocumentClass>, DocsiftError> {
        let doc = Document::open(path)?;
        Ok(match doc.kind {
            DocumentKind::Pdf => Some(
                self.classifier
                    .classify(self.text_layer.as_ref(), &doc.path),
            ),
            DocumentKind::Image => None,
        })
    }

    /// Extract the text of one PDF or image file.
    ///
    /// Missing files, unsupported extensions and text-layer failures are
    /// returned as errors. Rasterization failures degrade to an empty page
    /// list and per-page OCR failures to `PageOutcome::Failed`.
    pub fn extract(&self, path: &Path) -> Result<ExtractionReport, DocsiftError> {
        let doc = Document::open(path)?;
        let mut warnings = Vec::new();

        let (classification, method, pages) = match doc.kind {
            DocumentKind::Image => (
                None,
                ExtractionMethod::ImageOcr,
                self.extract_image(&doc.path)?,
            ),
            DocumentKind::Pdf => {
                let classification = if self.config.force_ocr {
                    None
                } else {
                    Some(self.classifier.classify(self.text_layer.as_ref(), &doc.path))
                };
                log::debug!(
                    "{}: classification {:?}, force_ocr {}",
                    doc.path.display(),
                    classification,
                    self.config.force_ocr
                );

                match classification {
                    Some(DocumentClass::Digital) => (
                        classification,
                        ExtractionMethod::TextLayer,
                        self.extract_text_layer(&doc.path)?,
                    ),
                    _ => (
                        classification,
                        ExtractionMethod::Ocr,
                        self.extract_scanned(&doc.path, &mut warnings)?,
                    ),
                }
            }
        };

        let report = ExtractionReport {
            source: doc.path,
            kind: doc.kind,
            classification,
            method,
            pages,
            warnings,
        };
        let failed = report.failed_pages().count();
        if failed > 0 {
            log::warn!(
                "{}: {} of {} page(s) could not be recognized",
                report.source.display(),
                failed,
                report.pages.len()
            );
        }
        Ok(report)
    }

    fn extract_text_layer(&self, pdf: &Path) -> Result<Vec<PageResult>, DocsiftError> {
        let count = self.text_layer.page_count(pdf)?;
        let mut pages = Vec::with_capacity(count);
        for index in 0..count {
            let text = self
                .text_layer
                .extract_page(pdf, index)
                .map_err(|e| match e {
                    DocsiftError::TextLayer { .. } => e,
                    other => DocsiftError::TextLayer {
                        page: index + 1,
                        reason: other.to_string(),
                    },
                })?;
            pages.push(PageResult::text(index + 1, text));
        }
        Ok(pages)
    }

    fn extract_scanned(
        &self,
        pdf: &Path,
        warnings: &mut Vec<String>,
    ) -> Result<Vec<PageResult>, DocsiftError> {
        let images = match self.rasterizer.rasterize(pdf, self.config.dpi) {
            Ok(images) => images,
            Err(e) => {
                log::warn!(
                    "{} rendering of {} failed: {}",
                    self.rasterizer.backend_name(),
                    pdf.display(),
                    e
                );
                warnings.push(format!("rasterization failed: {}", e));
                Vec::new()
            }
        };
        log::debug!("{}: {} page image(s) to recognize", pdf.display(), images.len());
        self.ocr_pages(images)
    }

    fn extract_image(&self, path: &Path) -> Result<Vec<PageResult>, DocsiftError> {
        let image = image::open(path)?;
        Ok(vec![self.ocr_page(1, image)])
    }

    /// Recognize every page concurrently.
    ///
    /// The indexed collect gives each task its own output slot, so the result
    /// is in page order whatever order the tasks finish in.
    fn ocr_pages(&self, images: Vec<DynamicImage>) -> Result<Vec<PageResult>, DocsiftError> {
        let run = || {
            images
                .into_par_iter()
                .enumerate()
                .map(|(index, image)| self.ocr_page(index + 1, image))
                .collect::<Vec<_>>()
        };

        match self.config.ocr_threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| DocsiftError::Ocr(e.to_string()))?;
                Ok(pool.install(run))
            }
            None => Ok(run()),
        }
    }

    fn ocr_page(&self, page_number: usize, image: DynamicImage) -> PageResult {
        let cleaned = self.denoiser.denoise(&image);
        drop(image);

        match self.ocr.recognize(&cleaned) {
            Ok(text) => PageResult::text(page_number, text),
            Err(e) => {
                log::warn!(
                    "{} failed on page {}: {}",
                    self.ocr.backend_name(),
                    page_number,
                    e
                );
                PageResult::failed(page_number, e.to_string())
            }
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}
