//! Per-file results and run statistics.

use crate::recipe::Recipe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of processing one JPEG file.
///
/// `recipe` and `output_path` are both `Some` when a document was written,
/// both `None` when the file was skipped because the response carried no
/// matching tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    /// File name within the scanned directory.
    pub file_name: String,
    /// The extracted recipe, if any.
    pub recipe: Option<Recipe>,
    /// Where the recipe JSON was written, if any.
    pub output_path: Option<PathBuf>,
    /// Whether the source image was recompressed in place first.
    pub recompressed: bool,
    /// Tokens consumed by the request.
    pub input_tokens: u32,
    /// Tokens produced by the response.
    pub output_tokens: u32,
    /// Wall-clock time for this file, milliseconds.
    pub duration_ms: u64,
}

/// Aggregate statistics for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// JPEG files found in the directory (non-JPEGs are not counted).
    pub jpeg_files: usize,
    /// Recipe documents written.
    pub recipes_written: usize,
    /// Files skipped because no extraction result came back.
    pub skipped_no_recipe: usize,
    /// Files recompressed in place before upload.
    pub recompressed_files: usize,
    /// Total input tokens across all calls.
    pub total_input_tokens: u64,
    /// Total output tokens across all calls.
    pub total_output_tokens: u64,
    /// Total wall-clock time, milliseconds.
    pub total_duration_ms: u64,
}

/// Everything a run produced: per-file results plus totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    pub files: Vec<FileResult>,
    pub stats: ExtractionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_serializes_to_json() {
        let output = ExtractionOutput {
            files: vec![FileResult {
                file_name: "cake.jpg".into(),
                recipe: None,
                output_path: None,
                recompressed: false,
                input_tokens: 1000,
                output_tokens: 0,
                duration_ms: 420,
            }],
            stats: ExtractionStats {
                jpeg_files: 1,
                skipped_no_recipe: 1,
                total_input_tokens: 1000,
                total_duration_ms: 420,
                ..Default::default()
            },
        };

        let json = serde_json::to_string_pretty(&output).unwrap();
        let back: ExtractionOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.files.len(), 1);
        assert_eq!(back.stats.skipped_no_recipe, 1);
    }
}
