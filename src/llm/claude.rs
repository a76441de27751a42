//! Claude (Anthropic) vision provider.
//!
//! One POST to `/v1/messages` per image, with `tool_choice` forcing the
//! model to answer through the extraction tool. No retry and no timeout
//! override: a failed call aborts the run.

use super::{
    ContentBlock, EncodedImage, ExtractionRequest, LlmError, MessageResponse, Usage, VisionProvider,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Claude Messages API provider.
pub struct ClaudeProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for ClaudeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // api_key deliberately omitted
        f.debug_struct("ClaudeProvider")
            .field("model", &self.model)
            .finish()
    }
}

impl ClaudeProvider {
    /// Create a new provider with the given API key and model.
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }
}

// ── Wire format ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    tools: Vec<WireTool<'a>>,
    tool_choice: ToolChoice<'a>,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    name: &'a str,
    description: &'a str,
    input_schema: &'a serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: Vec<WireContent<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireContent<'a> {
    Image { source: ImageSource<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

fn build_request<'a>(model: &'a str, request: &'a ExtractionRequest) -> MessagesRequest<'a> {
    let EncodedImage { data, media_type } = &request.image;
    MessagesRequest {
        model,
        max_tokens: request.max_tokens,
        system: &request.system,
        tools: vec![WireTool {
            name: &request.tool.name,
            description: &request.tool.description,
            input_schema: &request.tool.input_schema,
        }],
        tool_choice: ToolChoice {
            kind: "tool",
            name: &request.tool.name,
        },
        messages: vec![WireMessage {
            role: "user",
            content: vec![
                WireContent::Image {
                    source: ImageSource {
                        kind: "base64",
                        media_type,
                        data,
                    },
                },
                WireContent::Text {
                    text: &request.instruction,
                },
            ],
        }],
    }
}

#[async_trait]
impl VisionProvider for ClaudeProvider {
    async fn request_extraction(
        &self,
        request: &ExtractionRequest,
    ) -> Result<MessageResponse, LlmError> {
        let body = build_request(&self.model, request);
        debug!(
            model = %self.model,
            image_bytes = request.image.data.len(),
            "sending extraction request"
        );

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(LlmError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        if status != 200 {
            if let Ok(err) = serde_json::from_str::<ApiErrorBody>(&text) {
                return Err(LlmError::ApiError {
                    status,
                    message: err.error.message,
                });
            }
            return Err(LlmError::ApiError {
                status,
                message: text,
            });
        }

        let parsed: MessagesResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::ParseError(e.to_string()))?;

        debug!(
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            blocks = parsed.content.len(),
            "extraction response received"
        );

        Ok(MessageResponse {
            content: parsed.content,
            usage: parsed.usage,
        })
    }

    fn provider_name(&self) -> &'static str {
        "claude"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::recipe_tool;

    fn sample_request() -> ExtractionRequest {
        ExtractionRequest {
            system: "You are a recipe assistant.".to_string(),
            instruction: "use the recipe_formatter tool".to_string(),
            image: EncodedImage::jpeg("QUJD"),
            max_tokens: 2000,
            tool: recipe_tool(),
        }
    }

    #[test]
    fn request_body_carries_forced_tool_choice() {
        let req = sample_request();
        let body = serde_json::to_value(build_request("claude-3-sonnet-20240229", &req)).unwrap();

        assert_eq!(body["model"], "claude-3-sonnet-20240229");
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["tool_choice"]["type"], "tool");
        assert_eq!(body["tool_choice"]["name"], "recipe_formatter");
        assert_eq!(body["tools"][0]["name"], "recipe_formatter");
        assert_eq!(body["tools"][0]["input_schema"]["type"], "object");
    }

    #[test]
    fn request_body_image_block_precedes_instruction() {
        let req = sample_request();
        let body = serde_json::to_value(build_request("m", &req)).unwrap();
        let content = body["messages"][0]["content"].as_array().unwrap();

        assert_eq!(content.len(), 2);
        assert_eq!(content[0]["type"], "image");
        assert_eq!(content[0]["source"]["type"], "base64");
        assert_eq!(content[0]["source"]["media_type"], "image/jpeg");
        assert_eq!(content[0]["source"]["data"], "QUJD");
        assert_eq!(content[1]["type"], "text");
        assert_eq!(content[1]["text"], "use the recipe_formatter tool");
    }

    #[test]
    fn debug_output_hides_api_key() {
        let provider = ClaudeProvider::new("sk-secret".into(), "claude-3-sonnet-20240229".into());
        let rendered = format!("{provider:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("claude-3-sonnet-20240229"));
    }
}
