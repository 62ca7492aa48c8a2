//! Integration tests for the extraction pipeline.
//!
//! Uses mock backends in place of pdftotext, pdftoppm and tesseract, so
//! these tests run without poppler-utils or tesseract installed. Mock page
//! images encode their page number as the image width, which the mock OCR
//! engine reads back.

use docsift_core::classify::DocumentClass;
use docsift_core::config::ExtractionConfig;
use docsift_core::document::DocumentKind;
use docsift_core::error::DocsiftError;
use docsift_core::extraction::{Rasterizer, TextLayerExtractor};
use docsift_core::ocr::OcrEngine;
use docsift_core::pipeline::Pipeline;
use docsift_core::report::{ExtractionMethod, PageOutcome};
use image::DynamicImage;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;

#[derive(Default, Clone)]
struct Calls {
    text_layer: Arc<AtomicUsize>,
    rasterize: Arc<AtomicUsize>,
    ocr: Arc<AtomicUsize>,
}

impl Calls {
    fn total(&self) -> usize {
        self.text_layer.load(Ordering::SeqCst)
            + self.rasterize.load(Ordering::SeqCst)
            + self.ocr.load(Ordering::SeqCst)
    }
}

struct MockTextLayer {
    pages: Vec<Result<String, String>>,
    calls: Arc<AtomicUsize>,
}

impl TextLayerExtractor for MockTextLayer {
    fn page_count(&self, _pdf: &Path) -> Result<usize, DocsiftError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pages.len())
    }

    fn extract_page(&self, _pdf: &Path, page_index: usize) -> Result<String, DocsiftError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(page_index) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(reason)) => Err(DocsiftError::TextLayer {
                page: page_index + 1,
                reason: reason.clone(),
            }),
            None => Err(DocsiftError::TextLayer {
                page: page_index + 1,
                reason: "no such page".into(),
            }),
        }
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

struct MockRasterizer {
    pages: Option<usize>,
    calls: Arc<AtomicUsize>,
}

impl Rasterizer for MockRasterizer {
    fn rasterize(&self, _pdf: &Path, dpi: u32) -> Result<Vec<DynamicImage>, DocsiftError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(dpi, 300);
        match self.pages {
            Some(n) => Ok((1..=n as u32).map(|w| DynamicImage::new_rgb8(w, 1)).collect()),
            None => Err(DocsiftError::Rasterize("corrupt xref table".into())),
        }
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

/// Recognizes "text of page N" from an N-pixel-wide image. Earlier pages
/// take longer, so tasks finish in reverse page order.
struct MockOcr {
    total_pages: u32,
    fail_page: Option<u32>,
    calls: Arc<AtomicUsize>,
}

impl OcrEngine for MockOcr {
    fn recognize(&self, image: &DynamicImage) -> Result<String, DocsiftError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let page = image.width();
        let delay = self.total_pages.saturating_sub(page) as u64 * 15;
        std::thread::sleep(Duration::from_millis(delay));
        if Some(page) == self.fail_page {
            return Err(DocsiftError::Ocr("tesseract crashed".into()));
        }
        Ok(format!("text of page {page}"))
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

struct Setup {
    text_pages: Vec<Result<String, String>>,
    raster_pages: Option<usize>,
    fail_page: Option<u32>,
    config: ExtractionConfig,
}

impl Default for Setup {
    fn default() -> Self {
        Setup {
            text_pages: vec![],
            raster_pages: Some(0),
            fail_page: None,
            config: ExtractionConfig::default(),
        }
    }
}

impl Setup {
    fn build(self) -> (Pipeline, Calls) {
        let calls = Calls::default();
        let total_pages = self.raster_pages.unwrap_or(0) as u32;
        let pipeline = Pipeline::with_backends(
            self.config,
            Box::new(MockTextLayer {
                pages: self.text_pages,
                calls: calls.text_layer.clone(),
            }),
            Box::new(MockRasterizer {
                pages: self.raster_pages,
                calls: calls.rasterize.clone(),
            }),
            Box::new(MockOcr {
                total_pages: total_pages.max(1),
                fail_page: self.fail_page,
                calls: calls.ocr.clone(),
            }),
        );
        (pipeline, calls)
    }
}

fn temp_file(suffix: &str) -> NamedTempFile {
    tempfile::Builder::new().suffix(suffix).tempfile().unwrap()
}

fn texts(pages: &[&str]) -> Vec<Result<String, String>> {
    pages.iter().map(|p| Ok(p.to_string())).collect()
}

fn long_text() -> String {
    "This page carries a genuine, selectable text layer.".repeat(2)
}

// ---------------------------------------------------------------------------
// Digital path
// ---------------------------------------------------------------------------
#[test]
fn digital_three_pages_are_labelled_in_order() {
    let (pipeline, calls) = Setup {
        text_pages: texts(&["Alpha", "Beta", "Gamma"]),
        config: ExtractionConfig {
            scan_threshold: 5,
            ..ExtractionConfig::default()
        },
        ..Setup::default()
    }
    .build();
    let pdf = temp_file(".pdf");

    let report = pipeline.extract(pdf.path()).unwrap();

    assert_eq!(report.kind, DocumentKind::Pdf);
    assert_eq!(report.classification, Some(DocumentClass::Digital));
    assert_eq!(report.method, ExtractionMethod::TextLayer);
    assert_eq!(
        report.render_text(),
        "--- Page 1 ---\nAlpha\n--- Page 2 ---\nBeta\n--- Page 3 ---\nGamma"
    );
    assert_eq!(calls.rasterize.load(Ordering::SeqCst), 0);
    assert_eq!(calls.ocr.load(Ordering::SeqCst), 0);
}

#[test]
fn digital_path_is_idempotent() {
    let (pipeline, _) = Setup {
        text_pages: texts(&[long_text().as_str(), "second page", ""]),
        ..Setup::default()
    }
    .build();
    let pdf = temp_file(".pdf");

    let first = pipeline.extract(pdf.path()).unwrap().render_text();
    let second = pipeline.extract(pdf.path()).unwrap().render_text();
    assert_eq!(first, second);
    assert!(first.ends_with("--- Page 3 ---\n"));
}

#[test]
fn digital_page_failure_fails_the_document() {
    let (pipeline, _) = Setup {
        text_pages: vec![Ok(long_text()), Err("bad content stream".into())],
        ..Setup::default()
    }
    .build();
    let pdf = temp_file(".pdf");

    match pipeline.extract(pdf.path()).unwrap_err() {
        DocsiftError::TextLayer { page, reason } => {
            assert_eq!(page, 2);
            assert!(reason.contains("bad content stream"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Scanned path
// ---------------------------------------------------------------------------
#[test]
fn scanned_pages_keep_document_order() {
    let pages = 8;
    let (pipeline, calls) = Setup {
        text_pages: texts(&["", "", "", "", "", "", "", ""]),
        raster_pages: Some(pages),
        config: ExtractionConfig {
            ocr_threads: Some(pages),
            ..ExtractionConfig::default()
        },
        ..Setup::default()
    }
    .build();
    let pdf = temp_file(".pdf");

    let report = pipeline.extract(pdf.path()).unwrap();

    assert_eq!(report.classification, Some(DocumentClass::Scanned));
    assert_eq!(report.method, ExtractionMethod::Ocr);
    assert_eq!(calls.ocr.load(Ordering::SeqCst), pages);
    let expected: Vec<String> = (1..=pages)
        .map(|n| format!("--- Page {n} ---\ntext of page {n}"))
        .collect();
    assert_eq!(report.render_text(), expected.join("\n"));
    for (i, page) in report.pages.iter().enumerate() {
        assert_eq!(page.page_number, i + 1);
    }
}

#[test]
fn scanned_path_uses_default_pool() {
    let (pipeline, _) = Setup {
        text_pages: texts(&["   "]),
        raster_pages: Some(3),
        ..Setup::default()
    }
    .build();
    let pdf = temp_file(".pdf");

    let text = pipeline.extract(pdf.path()).unwrap().render_text();
    assert_eq!(
        text,
        concat!(
            "--- Page 1 ---\ntext of page 1\n",
            "--- Page 2 ---\ntext of page 2\n",
            "--- Page 3 ---\ntext of page 3"
        )
    );
}

#[test]
fn one_failed_page_does_not_abort_the_batch() {
    let (pipeline, _) = Setup {
        raster_pages: Some(3),
        fail_page: Some(2),
        ..Setup::default()
    }
    .build();
    let pdf = temp_file(".pdf");

    let report = pipeline.extract(pdf.path()).unwrap();

    assert_eq!(report.pages.len(), 3);
    assert_eq!(
        report.pages[1].outcome,
        PageOutcome::Failed {
            reason: "OCR failed: tesseract crashed".into()
        }
    );
    assert_eq!(
        report.pages[2].outcome,
        PageOutcome::Text {
            text: "text of page 3".into()
        }
    );
    assert!(report
        .render_text()
        .contains("--- Page 2 ---\n[page not recognized: OCR failed: tesseract crashed]"));
}

#[test]
fn zero_page_scan_yields_empty_output() {
    let (pipeline, calls) = Setup {
        raster_pages: Some(0),
        ..Setup::default()
    }
    .build();
    let pdf = temp_file(".pdf");

    let report = pipeline.extract(pdf.path()).unwrap();

    assert!(report.pages.is_empty());
    assert_eq!(report.render_text(), "");
    assert!(report.warnings.is_empty());
    assert_eq!(calls.ocr.load(Ordering::SeqCst), 0);
}

#[test]
fn rasterization_failure_degrades_to_no_pages() {
    let (pipeline, _) = Setup {
        raster_pages: None,
        ..Setup::default()
    }
    .build();
    let pdf = temp_file(".pdf");

    let report = pipeline.extract(pdf.path()).unwrap();

    assert_eq!(report.render_text(), "");
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("corrupt xref table"));
}

#[test]
fn unreadable_text_layer_is_treated_as_scanned() {
    let (pipeline, calls) = Setup {
        text_pages: vec![Err("encrypted".into())],
        raster_pages: Some(1),
        ..Setup::default()
    }
    .build();
    let pdf = temp_file(".pdf");

    let report = pipeline.extract(pdf.path()).unwrap();

    assert_eq!(report.classification, Some(DocumentClass::Scanned));
    assert_eq!(report.method, ExtractionMethod::Ocr);
    assert_eq!(calls.rasterize.load(Ordering::SeqCst), 1);
}

#[test]
fn force_ocr_skips_classification() {
    let (pipeline, calls) = Setup {
        text_pages: texts(&[long_text().as_str()]),
        raster_pages: Some(1),
        config: ExtractionConfig {
            force_ocr: true,
            ..ExtractionConfig::default()
        },
        ..Setup::default()
    }
    .build();
    let pdf = temp_file(".pdf");

    let report = pipeline.extract(pdf.path()).unwrap();

    assert_eq!(report.classification, None);
    assert_eq!(report.method, ExtractionMethod::Ocr);
    assert_eq!(calls.text_layer.load(Ordering::SeqCst), 0);
    assert_eq!(report.render_text(), "--- Page 1 ---\ntext of page 1");
}

// ---------------------------------------------------------------------------
// Images and input errors
// ---------------------------------------------------------------------------
#[test]
fn image_bypasses_classification() {
    for ext in [".png", ".PNG", ".bmp", ".tiff", ".jpg", ".jpeg"] {
        let (pipeline, calls) = Setup::default().build();
        let file = temp_file(ext);
        DynamicImage::new_rgb8(7, 3).save(file.path()).unwrap();

        let report = pipeline.extract(file.path()).unwrap();

        assert_eq!(report.kind, DocumentKind::Image, "{ext}");
        assert_eq!(report.method, ExtractionMethod::ImageOcr);
        assert_eq!(report.classification, None);
        assert_eq!(report.render_text(), "text of page 7");
        assert_eq!(calls.text_layer.load(Ordering::SeqCst), 0);
        assert_eq!(calls.rasterize.load(Ordering::SeqCst), 0);
        assert_eq!(pipeline.classify(file.path()).unwrap(), None);
    }
}

#[test]
fn undecodable_image_is_an_error() {
    let (pipeline, calls) = Setup::default().build();
    let file = temp_file(".png");
    std::fs::write(file.path(), b"not a png").unwrap();

    assert!(matches!(
        pipeline.extract(file.path()).unwrap_err(),
        DocsiftError::Image(_)
    ));
    assert_eq!(calls.ocr.load(Ordering::SeqCst), 0);
}

#[test]
fn unsupported_extension_makes_no_backend_calls() {
    let (pipeline, calls) = Setup {
        text_pages: texts(&[long_text().as_str()]),
        raster_pages: Some(2),
        ..Setup::default()
    }
    .build();
    let file = temp_file(".docx");

    match pipeline.extract(file.path()).unwrap_err() {
        DocsiftError::UnsupportedFileType { extension, .. } => assert_eq!(extension, ".docx"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(calls.total(), 0);
}

#[test]
fn missing_file_is_not_found() {
    let (pipeline, calls) = Setup::default().build();

    let err = pipeline
        .extract(Path::new("/nonexistent/report.pdf"))
        .unwrap_err();

    assert!(matches!(err, DocsiftError::NotFound(_)));
    assert_eq!(calls.total(), 0);
}

#[test]
fn classify_reports_verdict_for_pdfs() {
    let (pipeline, calls) = Setup {
        text_pages: texts(&[long_text().as_str(), ""]),
        ..Setup::default()
    }
    .build();
    let pdf = temp_file(".pdf");

    assert_eq!(
        pipeline.classify(pdf.path()).unwrap(),
        Some(DocumentClass::Digital)
    );
    assert_eq!(calls.text_layer.load(Ordering::SeqCst), 1);
}
