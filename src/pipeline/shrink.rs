//! Size guard: recompress oversized JPEGs in place.
//!
//! The threshold compares against binary MiB (`bytes / 1024²`). An image
//! over the threshold is decoded and re-encoded at the configured quality,
//! overwriting the original file. This is best-effort size reduction: the
//! result is not re-checked, and a still-oversized file is not an error.
//! A decode or write failure, however, is fatal — there is no point
//! uploading a JPEG this crate itself cannot read.

use crate::error::ExtractError;
use image::codecs::jpeg::JpegEncoder;
use image::ImageReader;
use std::path::Path;
use tracing::{debug, info};

/// Number of bytes in one binary MiB.
const MIB: f64 = 1024.0 * 1024.0;

/// File size in binary MiB.
pub fn size_mib(path: &Path) -> Result<f64, ExtractError> {
    let meta = std::fs::metadata(path).map_err(|e| ExtractError::ImageUnreadable {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(meta.len() as f64 / MIB)
}

/// Recompress `path` in place if it is larger than `max_mib`.
///
/// Returns `true` when the file was rewritten.
pub fn shrink_if_oversized(path: &Path, max_mib: f64, quality: u8) -> Result<bool, ExtractError> {
    let before_mib = size_mib(path)?;
    if before_mib <= max_mib {
        debug!(
            "{}: {:.2} MiB, under {:.2} MiB threshold",
            path.display(),
            before_mib,
            max_mib
        );
        return Ok(false);
    }

    let img = ImageReader::open(path)
        .map_err(|e| ExtractError::Recompress {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?
        .with_guessed_format()
        .map_err(|e| ExtractError::Recompress {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?
        .decode()
        .map_err(|e| ExtractError::Recompress {
            path: path.to_path_buf(),
            detail: format!("decode failed: {e}"),
        })?;

    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    img.write_with_encoder(encoder)
        .map_err(|e| ExtractError::Recompress {
            path: path.to_path_buf(),
            detail: format!("re-encode failed: {e}"),
        })?;

    std::fs::write(path, &buf).map_err(|e| ExtractError::Recompress {
        path: path.to_path_buf(),
        detail: format!("write failed: {e}"),
    })?;

    info!(
        "{}: recompressed {:.2} MiB -> {:.2} MiB at quality {}",
        path.display(),
        before_mib,
        buf.len() as f64 / MIB,
        quality
    );
    Ok(true)
}
