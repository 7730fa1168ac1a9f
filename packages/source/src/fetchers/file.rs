//! Local file reader.

use std::path::Path;

use crate::SourceError;

/// Reads a UTF-8 document from disk.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be read.
pub async fn read(path: &Path) -> Result<String, SourceError> {
    log::debug!("Reading {}", path.display());
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })
}
