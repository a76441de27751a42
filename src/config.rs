//! Configuration for a recipe-extraction run.
//!
//! All behaviour is controlled through [`ExtractionConfig`], built via its
//! [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config across a run and to diff two runs to
//! understand why their outputs differ.

use crate::error::ExtractError;
use crate::llm::VisionProvider;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default model when none is configured. Matches the model the extraction
/// prompt and schema were tuned against.
pub const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";

/// Configuration for a directory extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use img2recipe::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .max_image_mib(5.0)
///     .jpeg_quality(95)
///     .model("claude-3-sonnet-20240229")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Size threshold in binary MiB above which an image is recompressed
    /// in place before upload. Default: 5.0.
    ///
    /// The Anthropic API rejects very large request bodies; shrinking
    /// oversized photos first keeps the base64 payload within limits. This
    /// is best-effort — the result is not re-checked against the threshold.
    pub max_image_mib: f64,

    /// JPEG quality used when recompressing an oversized image. Range 1–100.
    /// Default: 95.
    ///
    /// 95 is near-lossless: recipe-card text stays crisp for the vision
    /// model while the typical phone photo shrinks well below the threshold.
    pub jpeg_quality: u8,

    /// Response-length budget in tokens. Default: 2000.
    ///
    /// A dense recipe card (long ingredient list, many steps) fits
    /// comfortably in 2000 output tokens; setting this lower risks a
    /// truncated tool payload that fails to deserialize.
    pub max_tokens: u32,

    /// Model identifier. If `None`, [`DEFAULT_MODEL`] is used.
    pub model: Option<String>,

    /// Custom system persona. If `None`, uses the built-in default.
    pub system_prompt: Option<String>,

    /// Directory where `<title>.json` files are written.
    /// Default: `"."` (the process working directory).
    pub out_dir: PathBuf,

    /// Pre-constructed provider. Takes precedence over environment-based
    /// construction. Useful in tests or when the caller needs custom
    /// middleware.
    pub provider: Option<Arc<dyn VisionProvider>>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_image_mib: 5.0,
            jpeg_quality: 95,
            max_tokens: 2000,
            model: None,
            system_prompt: None,
            out_dir: PathBuf::from("."),
            provider: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("max_image_mib", &self.max_image_mib)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("max_tokens", &self.max_tokens)
            .field("model", &self.model)
            .field("out_dir", &self.out_dir)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn VisionProvider>"))
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn max_image_mib(mut self, mib: f64) -> Self {
        self.config.max_image_mib = mib;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality;
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.out_dir = dir.into();
        self
    }

    pub fn provider(mut self, provider: Arc<dyn VisionProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if !(1..=100).contains(&c.jpeg_quality) {
            return Err(ExtractError::InvalidConfig(format!(
                "JPEG quality must be 1-100, got {}",
                c.jpeg_quality
            )));
        }
        if c.max_tokens == 0 {
            return Err(ExtractError::InvalidConfig(
                "max_tokens must be >= 1".into(),
            ));
        }
        if !c.max_image_mib.is_finite() || c.max_image_mib < 0.0 {
            return Err(ExtractError::InvalidConfig(format!(
                "max_image_mib must be a non-negative number, got {}",
                c.max_image_mib
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let config = ExtractionConfig::default();
        assert_eq!(config.max_image_mib, 5.0);
        assert_eq!(config.jpeg_quality, 95);
        assert_eq!(config.max_tokens, 2000);
        assert!(config.model.is_none());
        assert_eq!(config.out_dir, PathBuf::from("."));
    }

    #[test]
    fn builder_rejects_zero_quality() {
        let result = ExtractionConfig::builder().jpeg_quality(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_rejects_zero_max_tokens() {
        let result = ExtractionConfig::builder().max_tokens(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_rejects_negative_threshold() {
        let result = ExtractionConfig::builder().max_image_mib(-1.0).build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_sets_fields() {
        let config = ExtractionConfig::builder()
            .max_image_mib(2.5)
            .jpeg_quality(80)
            .max_tokens(1024)
            .model("claude-3-opus-20240229")
            .out_dir("/tmp/recipes")
            .build()
            .unwrap();

        assert_eq!(config.max_image_mib, 2.5);
        assert_eq!(config.jpeg_quality, 80);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.model.as_deref(), Some("claude-3-opus-20240229"));
        assert_eq!(config.out_dir, PathBuf::from("/tmp/recipes"));
    }
}
