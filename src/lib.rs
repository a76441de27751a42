//! # img2recipe
//!
//! Batch-convert photographed recipe cards to structured JSON using a
//! vision LLM with forced tool choice.
//!
//! ## Why this crate?
//!
//! Classic OCR turns a recipe card into a soup of unordered text — titles,
//! quantities, and steps all jumbled together. Instead this crate hands the
//! photo to a vision model and constrains the response to a single tool
//! invocation whose parameter schema *is* the recipe shape, so the output
//! is a typed document rather than prose to re-parse.
//!
//! ## Pipeline Overview
//!
//! ```text
//! directory of .jpg/.jpeg
//!  │
//!  ├─ 1. Scan     list JPEGs (case-sensitive extension, no recursion)
//!  ├─ 2. Shrink   recompress in place if over 5 MiB (quality 95)
//!  ├─ 3. Encode   bytes → base64 image attachment
//!  ├─ 4. Request  one forced-tool call per image, strictly sequential
//!  ├─ 5. Extract  match the tool_use block, deserialize into Recipe
//!  └─ 6. Persist  print, then write <title>.json (4-space indent)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use img2recipe::{extract_dir, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider built from ANTHROPIC_API_KEY in the environment
//!     let config = ExtractionConfig::default();
//!     let output = extract_dir("./recipe_photos", &config).await?;
//!     eprintln!(
//!         "{} recipes written, {} skipped",
//!         output.stats.recipes_written, output.stats.skipped_no_recipe
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Failure model
//!
//! A response with no usable tool invocation skips that file and the run
//! continues. Everything else — network errors, authentication failures,
//! corrupt JPEGs, unwritable paths — aborts the run on first occurrence,
//! with no retry and no cleanup of documents already written.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `img2recipe` binary (clap + anyhow + tracing-subscriber + dotenvy) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! img2recipe = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod recipe;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, DEFAULT_MODEL};
pub use error::ExtractError;
pub use extract::{extract_dir, extract_dir_sync};
pub use llm::{
    ClaudeProvider, ContentBlock, EncodedImage, ExtractionRequest, FakeProvider, LlmError,
    MessageResponse, ToolSpec, Usage, VisionProvider,
};
pub use output::{ExtractionOutput, ExtractionStats, FileResult};
pub use recipe::{Ingredient, MethodStep, Recipe, RECIPE_TOOL_NAME};
