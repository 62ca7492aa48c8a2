use docsift_core::report::ExtractionReport;

pub fn format(report: &ExtractionReport) -> String {
    report.render_text()
}

/// One-line summary for stderr after writing to a file.
pub fn summary(report: &ExtractionReport) -> String {
    let failed = report.failed_pages().count();
    let mut line = format!(
        "Extracted {} page(s) from {} via {}",
        report.pages.len(),
        report.source.display(),
        report.method
    );
    if failed > 0 {
        line.push_str(&format!(", {} page(s) not recognized", failed));
    }
    line
}
