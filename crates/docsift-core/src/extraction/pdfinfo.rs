use crate::error::DocsiftError;
use crate::tool;
use std::path::Path;
use std::process::Command;

/// Page count of `pdf` as reported by `pdfinfo`.
pub fn page_count(pdfinfo: &str, pdf: &Path) -> Result<usize, DocsiftError> {
    let stdout = tool::run(pdfinfo, Command::new(pdfinfo).arg(pdf))?;
    let info = String::from_utf8_lossy(&stdout);
    parse_page_count(&info).ok_or_else(|| DocsiftError::ToolFailed {
        tool: pdfinfo.to_string(),
        code: 0,
        stderr: "no 'Pages:' line in pdfinfo output".into(),
    })
}

fn parse_page_count(info: &str) -> Option<usize> {
    info.lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .and_then(|rest| rest.trim().parse().ok())
}
