use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DocsiftError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error(
        "unsupported file type '{extension}' for {} (supported: .pdf .jpg .jpeg .png .bmp .tiff)",
        path.display()
    )]
    UnsupportedFileType { path: PathBuf, extension: String },

    #[error("{tool} not found. {hint}")]
    ToolNotFound { tool: String, hint: &'static str },

    #[error("{tool} failed with exit code {code}: {stderr}")]
    ToolFailed {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("text layer extraction failed on page {page}: {reason}")]
    TextLayer { page: usize, reason: String },

    #[error("rasterization failed: {0}")]
    Rasterize(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
