use docsift_core::error::DocsiftError;
use docsift_core::report::ExtractionReport;

pub fn format(report: &ExtractionReport) -> Result<String, DocsiftError> {
    Ok(serde_json::to_string_pretty(report)?)
}
