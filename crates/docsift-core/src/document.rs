use crate::error::DocsiftError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Extensions routed to the single-image OCR path.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Image,
}

impl DocumentKind {
    /// Map a file extension (without the dot, any case) to a document kind.
    pub fn from_extension(ext: &str) -> Option<DocumentKind> {
        let lower = ext.to_ascii_lowercase();
        if lower == "pdf" {
            Some(DocumentKind::Pdf)
        } else if IMAGE_EXTENSIONS.contains(&lower.as_str()) {
            Some(DocumentKind::Image)
        } else {
            None
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Pdf => write!(f, "pdf"),
            DocumentKind::Image => write!(f, "image"),
        }
    }
}

/// An input file whose kind has been established from its extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub kind: DocumentKind,
}

impl Document {
    /// Check that `path` exists and has a supported extension.
    ///
    /// Existence is checked first, so a missing `.docx` reports `NotFound`.
    pub fn open(path: &Path) -> Result<Document, DocsiftError> {
        if !path.is_file() {
            return Err(DocsiftError::NotFound(path.to_path_buf()));
        }

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        match DocumentKind::from_extension(&ext) {
            Some(kind) => Ok(Document {
                path: path.to_path_buf(),
                kind,
            }),
            None => Err(DocsiftError::UnsupportedFileType {
                path: path.to_path_buf(),
                extension: if ext.is_empty() {
                    "(none)".into()
                } else {
                    format!(".{}", ext)
                },
            }),
        }
    }
}
