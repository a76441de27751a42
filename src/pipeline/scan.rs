//! Directory scanning: find the JPEG files to process.
//!
//! Extension matching is case-sensitive (`.jpg` / `.jpeg` exactly);
//! everything else — other files, subdirectories — is skipped silently
//! and never opened. Entries are sorted by name so a run is deterministic
//! regardless of filesystem listing order.

use crate::error::ExtractError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Whether a file name ends in `.jpg` or `.jpeg` (case-sensitive).
pub fn is_jpeg_name(name: &str) -> bool {
    name.ends_with(".jpg") || name.ends_with(".jpeg")
}

/// List the JPEG files directly inside `dir`, sorted by name.
///
/// Does not recurse into subdirectories.
pub fn jpeg_files(dir: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    if !dir.exists() {
        return Err(ExtractError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    if !dir.is_dir() {
        return Err(ExtractError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| ExtractError::DirUnreadable {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ExtractError::DirUnreadable {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if is_jpeg_name(name) {
            files.push(path);
        }
    }

    files.sort();
    debug!("found {} JPEG files in {}", files.len(), dir.display());
    Ok(files)
}
