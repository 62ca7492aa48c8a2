use docsift_core::config::{load_config, ExtractionConfig, ToolPaths};
use docsift_core::error::DocsiftError;
use docsift_core::extraction::pdftotext::PdftotextExtractor;
use docsift_core::ocr::tesseract::TesseractEngine;
use docsift_core::tool;
use std::path::Path;

pub fn show() -> Result<(), DocsiftError> {
    let json = serde_json::to_string_pretty(&ExtractionConfig::default())?;
    println!("{json}");
    Ok(())
}

pub fn validate(path: &Path) -> Result<(), DocsiftError> {
    let config = load_config(path)?;
    println!("{} is valid.", path.display());
    if config != ExtractionConfig::default() {
        println!("Effective configuration:");
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    println!("External tools:");
    for (name, available) in tool_availability(&config) {
        let status = if available { "found" } else { "not found" };
        println!("  {:<10} {}", name, status);
    }
    Ok(())
}

/// Whether each configured binary can be spawned, in pipeline order.
fn tool_availability(config: &ExtractionConfig) -> Vec<(&str, bool)> {
    let ToolPaths {
        pdftotext,
        pdfinfo,
        pdftoppm,
        tesseract,
    } = &config.tools;
    vec![
        (
            pdftotext.as_str(),
            PdftotextExtractor::with_tools(pdftotext, pdfinfo).is_available(),
        ),
        (pdfinfo.as_str(), tool::is_available(pdfinfo, "-v")),
        (pdftoppm.as_str(), tool::is_available(pdftoppm, "-v")),
        (
            tesseract.as_str(),
            TesseractEngine::with_tool(tesseract, config.ocr.clone()).is_available(),
        ),
    ]
}
