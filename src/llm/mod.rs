//! Vision LLM provider abstraction.
//!
//! The pipeline talks to the remote service through the [`VisionProvider`]
//! trait so tests can swap the real Anthropic client for a deterministic
//! fake. The wire-level shapes that both sides share — the forced-tool
//! request and the tagged response content — live here rather than in the
//! concrete provider, because the extraction stage has to pattern-match on
//! them regardless of which provider produced them.

mod claude;
mod fake;

pub use claude::ClaudeProvider;
pub use fake::FakeProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for provider calls.
///
/// None of these are retried: the run aborts on the first hard failure.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// A base64-encoded image ready for the multimodal request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedImage {
    /// Base64 text (standard alphabet, padded).
    pub data: String,
    /// Media type tag, e.g. `"image/jpeg"`.
    pub media_type: String,
}

impl EncodedImage {
    /// Wrap base64 data as a JPEG attachment.
    pub fn jpeg(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: "image/jpeg".to_string(),
        }
    }
}

/// A tool definition: name, description, and JSON Schema for its input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// One structured-extraction request: a single user turn carrying an image
/// and an instruction, with the response constrained to invoking `tool`.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// System-level persona framing.
    pub system: String,
    /// User instruction accompanying the image.
    pub instruction: String,
    /// The encoded image attachment.
    pub image: EncodedImage,
    /// Response-length budget in tokens.
    pub max_tokens: u32,
    /// The tool the model is forced to invoke.
    pub tool: ToolSpec,
}

/// One content item in the model's response, discriminated by its `type` tag.
///
/// The extraction stage matches on [`ContentBlock::ToolUse`]; anything the
/// API adds in the future lands in `Unknown` instead of failing the parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Free-form text from the model.
    Text { text: String },
    /// A structured tool invocation.
    ToolUse {
        #[serde(default)]
        id: String,
        name: String,
        input: serde_json::Value,
    },
    /// Any content kind this crate does not recognise.
    #[serde(other)]
    Unknown,
}

/// Token usage reported by the service.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

/// A provider response: content items plus usage accounting.
#[derive(Debug, Clone, Default)]
pub struct MessageResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

/// Trait for vision LLM providers.
///
/// Implementations should be stateless and thread-safe; the pipeline holds
/// one provider for the whole run and issues strictly sequential calls.
#[async_trait]
pub trait VisionProvider: Send + Sync + fmt::Debug {
    /// Issue one synchronous extraction request and return the raw response.
    async fn request_extraction(
        &self,
        request: &ExtractionRequest,
    ) -> Result<MessageResponse, LlmError>;

    /// Provider name (e.g. "claude", "fake").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g. "claude-3-sonnet-20240229").
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_use_block_parses_from_tagged_json() {
        let block: ContentBlock = serde_json::from_value(json!({
            "type": "tool_use",
            "id": "toolu_01",
            "name": "recipe_formatter",
            "input": {"title": "Soup"}
        }))
        .unwrap();

        match block {
            ContentBlock::ToolUse { name, input, .. } => {
                assert_eq!(name, "recipe_formatter");
                assert_eq!(input["title"], "Soup");
            }
            other => panic!("expected ToolUse, got {other:?}"),
        }
    }

    #[test]
    fn text_block_parses() {
        let block: ContentBlock =
            serde_json::from_value(json!({"type": "text", "text": "hello"})).unwrap();
        assert!(matches!(block, ContentBlock::Text { ref text } if text == "hello"));
    }

    #[test]
    fn unrecognised_kind_becomes_unknown() {
        let block: ContentBlock =
            serde_json::from_value(json!({"type": "thinking", "thinking": "..."})).unwrap();
        assert!(matches!(block, ContentBlock::Unknown));
    }

    #[test]
    fn encoded_image_jpeg_media_type() {
        let img = EncodedImage::jpeg("aGVsbG8=");
        assert_eq!(img.media_type, "image/jpeg");
        assert_eq!(img.data, "aGVsbG8=");
    }
}
