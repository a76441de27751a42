//! Error types for the img2recipe library.
//!
//! The pipeline has exactly one recoverable condition — a response with no
//! matching tool invocation — and that is not an error at all: the file is
//! skipped and the run continues. Everything in [`ExtractError`] is fatal
//! and terminates the run with no retry and no partial-result cleanup.

use crate::llm::LlmError;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the img2recipe library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The target directory was not found.
    #[error("Directory not found: '{path}'\nCheck the path exists and is readable.")]
    DirectoryNotFound { path: PathBuf },

    /// The target path exists but is not a directory.
    #[error("Not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    /// Listing the directory failed.
    #[error("Failed to read directory '{path}': {source}")]
    DirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading an image file failed.
    #[error("Failed to read image '{path}': {source}")]
    ImageUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Image errors ──────────────────────────────────────────────────────
    /// Decoding or re-encoding an oversized JPEG failed.
    #[error("Failed to recompress '{path}': {detail}")]
    Recompress { path: PathBuf, detail: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// No provider could be constructed (missing API key etc.).
    #[error("LLM provider is not configured.\n{hint}")]
    ProviderNotConfigured { hint: String },

    /// The remote call failed; propagated unmodified, no retry.
    #[error(transparent)]
    Llm(#[from] LlmError),

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not write a recipe JSON file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing a recipe failed.
    #[error("Failed to serialize recipe: {0}")]
    Serialize(#[from] serde_json::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
