use crate::classify::DocumentClass;
use crate::document::DocumentKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How the text of a document was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Selectable text read from the PDF.
    TextLayer,
    /// PDF pages rendered and recognized.
    Ocr,
    /// A standalone image recognized directly.
    ImageOcr,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMethod::TextLayer => write!(f, "text layer"),
            ExtractionMethod::Ocr => write!(f, "OCR"),
            ExtractionMethod::ImageOcr => write!(f, "image OCR"),
        }
    }
}

/// Result for one page.
///
/// `Text` with an empty string means the page had no text; `Failed` means
/// the page could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageOutcome {
    Text { text: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-based page number.
    pub page_number: usize,
    #[serde(flatten)]
    pub outcome: PageOutcome,
}

impl PageResult {
    pub fn text(page_number: usize, text: impl Into<String>) -> Self {
        PageResult {
            page_number,
            outcome: PageOutcome::Text { text: text.into() },
        }
    }

    pub fn failed(page_number: usize, reason: impl Into<String>) -> Self {
        PageResult {
            page_number,
            outcome: PageOutcome::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, PageOutcome::Failed { .. })
    }
}

/// Everything extracted from one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub source: PathBuf,
    pub kind: DocumentKind,
    /// Verdict of the classifier; absent for images and forced OCR.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<DocumentClass>,
    pub method: ExtractionMethod,
    /// Pages in ascending page order.
    pub pages: Vec<PageResult>,
    /// Problems that degraded the result without aborting it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    pub fn failed_pages(&self) -> impl Iterator<Item = &PageResult> {
        self.pages.iter().filter(|p| p.is_failed())
    }

    /// Plain-text rendering.
    ///
    /// PDF pages are each preceded by a `--- Page N ---` line and joined with
    /// newlines. A standalone image renders as its bare text.
    pub fn render_text(&self) -> String {
        if self.method == ExtractionMethod::ImageOcr {
            return self.pages.iter().map(page_body).collect::<Vec<_>>().join("\n");
        }

        self.pages
            .iter()
            .map(|p| format!("{}\n{}", page_header(p.page_number), page_body(p)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn page_header(page_number: usize) -> String {
    format!("--- Page {} ---", page_number)
}

fn page_body(page: &PageResult) -> String {
    match &page.outcome {
        PageOutcome::Text { text } => text.clone(),
        PageOutcome::Failed { reason } => format!("[page not recognized: {}]", reason),
    }
}
