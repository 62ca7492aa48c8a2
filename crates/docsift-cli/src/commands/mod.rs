pub mod classify;
pub mod config;
pub mod extract;

use docsift_core::config::{load_config, ExtractionConfig};
use docsift_core::error::DocsiftError;
use std::path::Path;

/// Load `--config` if given, otherwise the defaults.
pub fn resolve_config(path: Option<&Path>) -> Result<ExtractionConfig, DocsiftError> {
    match path {
        Some(p) => load_config(p),
        None => Ok(ExtractionConfig::default()),
    }
}
