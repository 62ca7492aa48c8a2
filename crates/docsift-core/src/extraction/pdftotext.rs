use crate::error::DocsiftError;
use crate::extraction::{pdfinfo, TextLayerExtractor};
use crate::tool;
use std::path::Path;
use std::process::Command;

/// Text-layer backend using pdftotext (from poppler-utils).
///
/// Each call extracts exactly one page with `-f N -l N`, so a malformed page
/// fails on its own call.
pub struct PdftotextExtractor {
    pdftotext: String,
    pdfinfo: String,
}

impl PdftotextExtractor {
    pub fn new() -> Self {
        Self::with_tools("pdftotext", "pdfinfo")
    }

    pub fn with_tools(pdftotext: &str, pdfinfo: &str) -> Self {
        PdftotextExtractor {
            pdftotext: pdftotext.to_string(),
            pdfinfo: pdfinfo.to_string(),
        }
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available(&self) -> bool {
        tool::is_available(&self.pdftotext, "-v")
    }

    fn command(&self, pdf: &Path, page_number: usize) -> Command {
        let page = page_number.to_string();
        let mut cmd = Command::new(&self.pdftotext);
        cmd.args(["-f", &page, "-l", &page, "-enc", "UTF-8"])
            .arg(pdf)
            .arg("-"); // output to stdout
        cmd
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayerExtractor for PdftotextExtractor {
    fn page_count(&self, pdf: &Path) -> Result<usize, DocsiftError> {
        pdfinfo::page_count(&self.pdfinfo, pdf)
    }

    fn extract_page(&self, pdf: &Path, page_index: usize) -> Result<String, DocsiftError> {
        let stdout = tool::run(&self.pdftotext, &mut self.command(pdf, page_index + 1))?;
        Ok(clean_page_text(&String::from_utf8_lossy(&stdout)))
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Strip the trailing form feed pdftotext emits after every page.
fn clean_page_text(raw: &str) -> String {
    raw.trim_end_matches(|c: char| c == '\x0c' || c.is_whitespace())
        .to_string()
}
