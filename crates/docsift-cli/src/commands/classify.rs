use docsift_core::error::DocsiftError;
use docsift_core::pipeline::Pipeline;
use std::path::PathBuf;

use crate::commands::resolve_config;

pub fn run(input_file: PathBuf, config: Option<PathBuf>) -> Result<(), DocsiftError> {
    let config = resolve_config(config.as_deref())?;
    let pipeline = Pipeline::new(config);

    match pipeline.classify(&input_file)? {
        Some(class) => println!("{class}"),
        None => println!("image"),
    }

    Ok(())
}
