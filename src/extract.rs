//! Directory extraction entry points.
//!
//! [`extract_dir`] is the primary API: it resolves the provider once, then
//! processes each JPEG fully — size guard, encode, one remote call, write —
//! before touching the next. Execution is strictly sequential with no
//! concurrent in-flight requests, so the only shared resource is the
//! filesystem itself.

use crate::config::{ExtractionConfig, DEFAULT_MODEL};
use crate::error::ExtractError;
use crate::llm::{ClaudeProvider, VisionProvider};
use crate::output::{ExtractionOutput, ExtractionStats, FileResult};
use crate::pipeline::{encode, persist, request, scan, shrink};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Extract every JPEG in `dir` into a recipe JSON document.
///
/// # Returns
/// `Ok(ExtractionOutput)` when the run completes, including when some or
/// all files were skipped because no extraction result came back (check
/// `output.stats.skipped_no_recipe`).
///
/// # Errors
/// Any remote call failure, recompression failure, or filesystem error is
/// fatal and aborts the run immediately — no retry, no cleanup of recipes
/// already written.
pub async fn extract_dir(
    dir: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let total_start = Instant::now();
    let dir = dir.as_ref();
    info!("starting extraction: {}", dir.display());

    let files = scan::jpeg_files(dir)?;
    let provider = resolve_provider(config)?;
    debug!(
        provider = provider.provider_name(),
        model = provider.model_name(),
        files = files.len(),
        "provider resolved"
    );

    let mut results: Vec<FileResult> = Vec::with_capacity(files.len());

    for path in &files {
        let file_start = Instant::now();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let recompressed =
            shrink::shrink_if_oversized(path, config.max_image_mib, config.jpeg_quality)?;
        let image = encode::encode_jpeg(path)?;
        let outcome = request::extract_recipe(&provider, image, config).await?;

        let mut result = FileResult {
            file_name,
            recipe: None,
            output_path: None,
            recompressed,
            input_tokens: outcome.usage.input_tokens,
            output_tokens: outcome.usage.output_tokens,
            duration_ms: 0,
        };

        match outcome.recipe {
            Some(recipe) => {
                let rendered = persist::render(&recipe)?;
                println!("{}", String::from_utf8_lossy(&rendered));
                let output_path = persist::write_recipe(&recipe, &config.out_dir)?;
                result.recipe = Some(recipe);
                result.output_path = Some(output_path);
            }
            None => {
                println!("No recipe found in the response.");
            }
        }

        result.duration_ms = file_start.elapsed().as_millis() as u64;
        results.push(result);
    }

    let stats = ExtractionStats {
        jpeg_files: results.len(),
        recipes_written: results.iter().filter(|r| r.output_path.is_some()).count(),
        skipped_no_recipe: results.iter().filter(|r| r.output_path.is_none()).count(),
        recompressed_files: results.iter().filter(|r| r.recompressed).count(),
        total_input_tokens: results.iter().map(|r| r.input_tokens as u64).sum(),
        total_output_tokens: results.iter().map(|r| r.output_tokens as u64).sum(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "extraction complete: {}/{} recipes written, {}ms total",
        stats.recipes_written, stats.jpeg_files, stats.total_duration_ms
    );

    Ok(ExtractionOutput {
        files: results,
        stats,
    })
}

/// Synchronous wrapper around [`extract_dir`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_dir_sync(
    dir: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(extract_dir(dir, config))
}

/// Resolve the vision provider, most-specific first.
///
/// 1. **Pre-built provider** (`config.provider`) — the caller constructed
///    and configured it entirely; used as-is. This is how tests inject a
///    fake.
/// 2. **Environment** — `ANTHROPIC_API_KEY` constructs a [`ClaudeProvider`]
///    with `config.model` or the default model.
fn resolve_provider(config: &ExtractionConfig) -> Result<Arc<dyn VisionProvider>, ExtractError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    let api_key = std::env::var("ANTHROPIC_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ExtractError::ProviderNotConfigured {
            hint: "Set ANTHROPIC_API_KEY in the environment (or a .env file), \
                   or pass a pre-built provider in ExtractionConfig."
                .to_string(),
        })?;

    let model = config
        .model
        .clone()
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    Ok(Arc::new(ClaudeProvider::new(api_key, model)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::FakeProvider;

    #[test]
    fn prebuilt_provider_takes_precedence() {
        let fake: Arc<dyn VisionProvider> = Arc::new(FakeProvider::new());
        let config = ExtractionConfig::builder()
            .provider(Arc::clone(&fake))
            .build()
            .unwrap();

        let resolved = resolve_provider(&config).unwrap();
        assert_eq!(resolved.provider_name(), "fake");
    }
}
