//! Running the external binaries docsift delegates to.

use crate::error::DocsiftError;
use std::process::Command;

/// Installation hint shown when a binary cannot be spawned.
pub fn install_hint(tool: &str) -> &'static str {
    if tool.contains("tesseract") {
        "Install tesseract: brew install tesseract (macOS) or apt install tesseract-ocr (Linux)"
    } else {
        "Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)"
    }
}

/// Run `cmd` to completion and return its stdout.
///
/// A binary that cannot be found maps to `ToolNotFound`; a non-zero exit
/// maps to `ToolFailed` carrying stderr.
pub fn run(tool: &str, cmd: &mut Command) -> Result<Vec<u8>, DocsiftError> {
    log::debug!("running {:?}", cmd);

    let output = cmd.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DocsiftError::ToolNotFound {
                tool: tool.to_string(),
                hint: install_hint(tool),
            }
        } else {
            DocsiftError::Io(e)
        }
    })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(DocsiftError::ToolFailed {
            tool: tool.to_string(),
            code,
            stderr,
        });
    }

    Ok(output.stdout)
}

/// Check whether `tool` can be spawned at all.
pub fn is_available(tool: &str, version_flag: &str) -> bool {
    Command::new(tool)
        .arg(version_flag)
        .output()
        .map(|o| o.status.success() || !o.stderr.is_empty())
        .unwrap_or(false)
}
