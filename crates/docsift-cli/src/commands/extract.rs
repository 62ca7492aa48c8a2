use docsift_core::config::{validate_config, ExtractionConfig};
use docsift_core::error::DocsiftError;
use docsift_core::pipeline::Pipeline;
use std::path::PathBuf;

use crate::commands::resolve_config;
use crate::output;

pub struct ExtractArgs {
    pub input_file: PathBuf,
    pub output_format: String,
    pub output_file: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub force_ocr: bool,
    pub language: Option<String>,
}

pub fn run(args: ExtractArgs) -> Result<(), DocsiftError> {
    let config = apply_overrides(
        resolve_config(args.config.as_deref())?,
        args.force_ocr,
        args.language,
    )?;

    let pipeline = Pipeline::new(config);
    let report = pipeline.extract(&args.input_file)?;

    for w in &report.warnings {
        eprintln!("  warning: {}", w);
    }

    let output_str = match args.output_format.as_str() {
        "json" => output::json::format(&report)?,
        _ => output::text::format(&report),
    };

    match args.output_file {
        Some(path) => {
            std::fs::write(&path, &output_str)?;
            eprintln!(
                "{}, written to {}",
                output::text::summary(&report),
                path.display()
            );
        }
        None => {
            println!("{output_str}");
        }
    }

    Ok(())
}

/// Layer the command-line flags over the loaded config and check the result.
fn apply_overrides(
    mut config: ExtractionConfig,
    force_ocr: bool,
    language: Option<String>,
) -> Result<ExtractionConfig, DocsiftError> {
    if force_ocr {
        config.force_ocr = true;
    }
    if language.is_some() {
        config.ocr.language = language;
    }
    validate_config(&config)?;
    Ok(config)
}
