//! Fake vision provider for testing.
//!
//! Serves queued responses in order and records every request it receives,
//! so tests can assert how many remote calls the pipeline made and what
//! each one carried — without network access or API costs.

use super::{
    ContentBlock, ExtractionRequest, LlmError, MessageResponse, Usage, VisionProvider,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A trimmed-down record of one request the fake received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub media_type: String,
    pub instruction: String,
    pub tool_name: String,
    pub max_tokens: u32,
    /// Length of the base64 payload, enough to tell images apart.
    pub image_data_len: usize,
}

/// A fake provider that replays canned responses.
///
/// Responses are consumed front-to-back; when the queue is empty the
/// default response (if any) is returned, otherwise the call fails.
#[derive(Debug, Default)]
pub struct FakeProvider {
    responses: Mutex<VecDeque<MessageResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
    default_response: Option<MessageResponse>,
}

impl FakeProvider {
    /// A fake with no queued responses and no default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response containing a `tool_use` invocation of
    /// `recipe_formatter` with the given input payload.
    pub fn push_recipe(&self, input: serde_json::Value) {
        self.push_response(MessageResponse {
            content: vec![ContentBlock::ToolUse {
                id: format!("toolu_{:04}", self.queued_len()),
                name: crate::recipe::RECIPE_TOOL_NAME.to_string(),
                input,
            }],
            usage: Usage {
                input_tokens: 1200,
                output_tokens: 300,
            },
        });
    }

    /// Queue a response with only a text block (no tool invocation).
    pub fn push_text(&self, text: &str) {
        self.push_response(MessageResponse {
            content: vec![ContentBlock::Text {
                text: text.to_string(),
            }],
            usage: Usage::default(),
        });
    }

    /// Queue an arbitrary response.
    pub fn push_response(&self, response: MessageResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Use `response` whenever the queue runs dry.
    pub fn with_default_response(mut self, response: MessageResponse) -> Self {
        self.default_response = Some(response);
        self
    }

    /// Number of requests served so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Copies of all requests received so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn queued_len(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl VisionProvider for FakeProvider {
    async fn request_extraction(
        &self,
        request: &ExtractionRequest,
    ) -> Result<MessageResponse, LlmError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            media_type: request.image.media_type.clone(),
            instruction: request.instruction.clone(),
            tool_name: request.tool.name.clone(),
            max_tokens: request.max_tokens,
            image_data_len: request.image.data.len(),
        });

        if let Some(response) = self.responses.lock().unwrap().pop_front() {
            return Ok(response);
        }

        match &self.default_response {
            Some(response) => Ok(response.clone()),
            None => Err(LlmError::RequestFailed(
                "FakeProvider: no response queued".to_string(),
            )),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::EncodedImage;
    use crate::recipe::recipe_tool;
    use serde_json::json;

    fn request() -> ExtractionRequest {
        ExtractionRequest {
            system: "persona".to_string(),
            instruction: "use the recipe_formatter tool".to_string(),
            image: EncodedImage::jpeg("QUJDRA=="),
            max_tokens: 2000,
            tool: recipe_tool(),
        }
    }

    #[tokio::test]
    async fn serves_queued_responses_in_order() {
        let fake = FakeProvider::new();
        fake.push_text("first");
        fake.push_text("second");

        let r1 = fake.request_extraction(&request()).await.unwrap();
        let r2 = fake.request_extraction(&request()).await.unwrap();
        assert!(matches!(&r1.content[0], ContentBlock::Text { text } if text == "first"));
        assert!(matches!(&r2.content[0], ContentBlock::Text { text } if text == "second"));
        assert_eq!(fake.call_count(), 2);
    }

    #[tokio::test]
    async fn empty_queue_without_default_is_an_error() {
        let fake = FakeProvider::new();
        assert!(fake.request_extraction(&request()).await.is_err());
    }

    #[tokio::test]
    async fn records_request_details() {
        let fake = FakeProvider::new();
        fake.push_recipe(json!({"title": "Soup", "cook_time": 30, "prep_time": 10, "serves": 4}));

        fake.request_extraction(&request()).await.unwrap();

        let recorded = fake.requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].media_type, "image/jpeg");
        assert_eq!(recorded[0].tool_name, "recipe_formatter");
        assert_eq!(recorded[0].max_tokens, 2000);
        assert_eq!(recorded[0].image_data_len, 8);
    }
}
