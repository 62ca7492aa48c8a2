use crate::extraction::TextLayerExtractor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentClass {
    /// The PDF carries a usable text layer.
    Digital,
    /// The PDF's pages are images; text must come from OCR.
    Scanned,
}

impl fmt::Display for DocumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentClass::Digital => write!(f, "digital"),
            DocumentClass::Scanned => write!(f, "scanned"),
        }
    }
}

/// Decides digital vs scanned from the text layer of the first page only.
///
/// A PDF whose first page is a cover image is classified as scanned even if
/// later pages have text.
#[derive(Debug, Clone)]
pub struct Classifier {
    threshold: usize,
}

impl Classifier {
    pub fn new(threshold: usize) -> Self {
        Classifier { threshold }
    }

    pub fn classify(&self, extractor: &dyn TextLayerExtractor, pdf: &Path) -> DocumentClass {
        match extractor.extract_page(pdf, 0) {
            Ok(text) => self.classify_text(&text),
            Err(e) => {
                log::warn!(
                    "text layer of {} unreadable ({}), treating as scanned",
                    pdf.display(),
                    e
                );
                DocumentClass::Scanned
            }
        }
    }

    /// Verdict for a given first-page text.
    pub fn classify_text(&self, first_page: &str) -> DocumentClass {
        let chars = first_page.trim().chars().count();
        log::debug!(
            "first page has {} text characters (threshold {})",
            chars,
            self.threshold
        );
        if chars < self.threshold {
            DocumentClass::Scanned
        } else {
            DocumentClass::Digital
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(50)
    }
}
