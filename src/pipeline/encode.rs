//! Transport encoding: file bytes to a base64 [`EncodedImage`].
//!
//! The bytes are read *after* the size guard has run, so an image that was
//! recompressed in place is encoded in its rewritten form.

use crate::error::ExtractError;
use crate::llm::EncodedImage;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use tracing::debug;

/// Read `path` and base64-encode it as a JPEG attachment.
pub fn encode_jpeg(path: &Path) -> Result<EncodedImage, ExtractError> {
    let bytes = std::fs::read(path).map_err(|e| ExtractError::ImageUnreadable {
        path: path.to_path_buf(),
        source: e,
    })?;

    let b64 = STANDARD.encode(&bytes);
    debug!(
        "{}: encoded {} bytes -> {} bytes base64",
        path.display(),
        bytes.len(),
        b64.len()
    );

    Ok(EncodedImage::jpeg(b64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_bytes_on_disk_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.jpg");
        std::fs::write(&path, b"jpeg bytes here").unwrap();

        let encoded = encode_jpeg(&path).unwrap();
        assert_eq!(encoded.media_type, "image/jpeg");
        assert_eq!(STANDARD.decode(&encoded.data).unwrap(), b"jpeg bytes here");
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = encode_jpeg(Path::new("/no/such/img.jpg"));
        assert!(matches!(result, Err(ExtractError::ImageUnreadable { .. })));
    }
}
