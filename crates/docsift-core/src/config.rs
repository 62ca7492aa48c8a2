use crate::error::DocsiftError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted denoise filter strength. Well before this the filter
/// already smears glyph edges.
pub const MAX_FILTER_STRENGTH: f32 = 100.0;

/// Tunables for a single extraction run.
///
/// Every field has a default, so a config file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Page-0 text shorter than this (after trimming) marks the PDF as scanned.
    pub scan_threshold: usize,
    /// Rasterization resolution for the OCR path.
    pub dpi: u32,
    /// Worker threads used while rendering pages.
    pub raster_threads: usize,
    /// Worker threads for the per-page OCR fan-out. `None` uses the rayon default pool.
    pub ocr_threads: Option<usize>,
    /// Send every PDF through OCR, skipping classification.
    pub force_ocr: bool,
    pub ocr: OcrSettings,
    pub denoise: DenoiseParams,
    pub tools: ToolPaths,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            scan_threshold: 50,
            dpi: 300,
            raster_threads: 5,
            ocr_threads: None,
            force_ocr: false,
            ocr: OcrSettings::default(),
            denoise: DenoiseParams::default(),
            tools: ToolPaths::default(),
        }
    }
}

/// Tesseract engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// OCR engine mode (3 = default engine).
    pub oem: u8,
    /// Page segmentation mode (1 = automatic with orientation detection).
    pub psm: u8,
    /// Tesseract language code, e.g. "eng+deu". `None` leaves tesseract's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        OcrSettings {
            oem: 3,
            psm: 1,
            language: None,
        }
    }
}

/// Parameters of the colour non-local-means filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseParams {
    /// Filter strength for luminance.
    pub h: f32,
    /// Filter strength for the colour components.
    pub h_color: f32,
    /// Side of the square patch compared between pixels. Must be odd.
    pub template_window: usize,
    /// Side of the square area searched for similar patches. Must be odd.
    pub search_window: usize,
}

impl Default for DenoiseParams {
    fn default() -> Self {
        DenoiseParams {
            h: 10.0,
            h_color: 10.0,
            template_window: 7,
            search_window: 21,
        }
    }
}

/// Names or paths of the external binaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub pdftotext: String,
    pub pdfinfo: String,
    pub pdftoppm: String,
    pub tesseract: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        ToolPaths {
            pdftotext: "pdftotext".into(),
            pdfinfo: "pdfinfo".into(),
            pdftoppm: "pdftoppm".into(),
            tesseract: "tesseract".into(),
        }
    }
}

/// Load a config from a JSON file.
pub fn load_config(path: &Path) -> Result<ExtractionConfig, DocsiftError> {
    let content = std::fs::read_to_string(path).map_err(|e| DocsiftError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: ExtractionConfig =
        serde_json::from_str(&content).map_err(|e| DocsiftError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<ExtractionConfig, DocsiftError> {
    let config: ExtractionConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a config is usable.
pub fn validate_config(config: &ExtractionConfig) -> Result<(), DocsiftError> {
    if config.dpi == 0 {
        return Err(DocsiftError::ConfigInvalid("dpi must be positive".into()));
    }

    if config.raster_threads == 0 {
        return Err(DocsiftError::ConfigInvalid(
            "raster_threads must be positive".into(),
        ));
    }

    if config.ocr_threads == Some(0) {
        return Err(DocsiftError::ConfigInvalid(
            "ocr_threads must be positive when set".into(),
        ));
    }

    let d = &config.denoise;
    for (name, size) in [
        ("template_window", d.template_window),
        ("search_window", d.search_window),
    ] {
        if size == 0 || size % 2 == 0 {
            return Err(DocsiftError::ConfigInvalid(format!(
                "denoise.{} must be a positive odd number, got {}",
                name, size
            )));
        }
    }
    if d.template_window > d.search_window {
        return Err(DocsiftError::ConfigInvalid(format!(
            "denoise.template_window ({}) must not exceed denoise.search_window ({})",
            d.template_window, d.search_window
        )));
    }
    for (name, strength) in [("h", d.h), ("h_color", d.h_color)] {
        if !(strength > 0.0 && strength <= MAX_FILTER_STRENGTH) {
            return Err(DocsiftError::ConfigInvalid(format!(
                "denoise.{} must be in (0, {}], got {}",
                name, MAX_FILTER_STRENGTH, strength
            )));
        }
    }

    if let Some(ref lang) = config.ocr.language {
        if lang.trim().is_empty() {
            return Err(DocsiftError::ConfigInvalid(
                "ocr.language must not be empty when set".into(),
            ));
        }
    }

    let t = &config.tools;
    for (name, value) in [
        ("pdftotext", &t.pdftotext),
        ("pdfinfo", &t.pdfinfo),
        ("pdftoppm", &t.pdftoppm),
        ("tesseract", &t.tesseract),
    ] {
        if value.trim().is_empty() {
            return Err(DocsiftError::ConfigInvalid(format!(
                "tools.{} must not be empty",
                name
            )));
        }
    }

    Ok(())
}
