//! Shared output helpers.

use fablewright::{FablewrightResult, FileError, FileErrorKind, JsonError};
use serde::Serialize;
use std::path::Path;

/// Pretty JSON rendering of `value`.
pub fn to_json<T: Serialize>(value: &T) -> FablewrightResult<String> {
    Ok(serde_json::to_string_pretty(value).map_err(|e| JsonError::new(e.to_string()))?)
}

/// Write `text` to `path`, or print it when no path is given.
pub fn emit(text: &str, path: Option<&Path>) -> FablewrightResult<()> {
    match path {
        Some(path) => {
            std::fs::write(path, text).map_err(|e| {
                FileError::new(FileErrorKind::Write {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
            })?;
            tracing::info!(path = %path.display(), "Output written");
        }
        None => println!("{}", text),
    }
    Ok(())
}

/// Read a file, reporting the path on failure.
pub fn read_file(path: &Path) -> FablewrightResult<Vec<u8>> {
    Ok(std::fs::read(path).map_err(|e| {
        FileError::new(FileErrorKind::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    })?)
}
