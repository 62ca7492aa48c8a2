use crate::config::OcrSettings;
use crate::error::DocsiftError;
use crate::ocr::OcrEngine;
use crate::tool;
use image::DynamicImage;
use std::path::Path;
use std::process::Command;

/// OCR backend driving the `tesseract` command line.
///
/// Each call writes the image to a temporary PNG and reads the recognized
/// text from tesseract's stdout.
pub struct TesseractEngine {
    tesseract: String,
    settings: OcrSettings,
}

impl TesseractEngine {
    pub fn new(settings: OcrSettings) -> Self {
        Self::with_tool("tesseract", settings)
    }

    pub fn with_tool(tesseract: &str, settings: OcrSettings) -> Self {
        TesseractEngine {
            tesseract: tesseract.to_string(),
            settings,
        }
    }

    /// Check if tesseract is available on the system.
    pub fn is_available(&self) -> bool {
        tool::is_available(&self.tesseract, "--version")
    }

    fn command(&self, input: &Path) -> Command {
        let mut cmd = Command::new(&self.tesseract);
        cmd.arg(input)
            .arg("stdout")
            .args(["--oem", &self.settings.oem.to_string()])
            .args(["--psm", &self.settings.psm.to_string()]);
        if let Some(ref lang) = self.settings.language {
            cmd.args(["-l", lang]);
        }
        cmd
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new(OcrSettings::default())
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<String, DocsiftError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(DocsiftError::Ocr("image is empty".into()));
        }

        let input = tempfile::Builder::new()
            .prefix("docsift-ocr-")
            .suffix(".png")
            .tempfile()?;
        image.save_with_format(input.path(), image::ImageFormat::Png)?;

        let stdout = tool::run(&self.tesseract, &mut self.command(input.path()))?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }

    fn backend_name(&self) -> &str {
        "tesseract"
    }
}
