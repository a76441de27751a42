//! The network stage: one forced-tool call, then response extraction.
//!
//! This module builds the [`ExtractionRequest`], issues exactly one call
//! through the provider (no retry, no timeout override), and scans the
//! response content for the `tool_use` block naming the extraction tool.
//! A response without such a block — or with a payload that does not
//! deserialize into a [`Recipe`] — yields `None`: the caller skips the
//! file and continues.

use crate::config::ExtractionConfig;
use crate::llm::{ContentBlock, EncodedImage, ExtractionRequest, LlmError, Usage, VisionProvider};
use crate::prompts::{DEFAULT_SYSTEM_PROMPT, TOOL_INSTRUCTION};
use crate::recipe::{recipe_tool, Recipe, RECIPE_TOOL_NAME};
use std::sync::Arc;
use tracing::warn;

/// What one request produced: possibly a recipe, always usage accounting.
#[derive(Debug)]
pub struct RequestOutcome {
    pub recipe: Option<Recipe>,
    pub usage: Usage,
}

/// Build the fixed extraction request for one encoded image.
pub fn build_request(image: EncodedImage, config: &ExtractionConfig) -> ExtractionRequest {
    ExtractionRequest {
        system: config
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        instruction: TOOL_INSTRUCTION.to_string(),
        image,
        max_tokens: config.max_tokens,
        tool: recipe_tool(),
    }
}

/// Scan response content for the matching tool invocation and deserialize
/// its payload.
pub fn find_recipe(content: &[ContentBlock]) -> Option<Recipe> {
    for block in content {
        if let ContentBlock::ToolUse { name, input, .. } = block {
            if name != RECIPE_TOOL_NAME {
                continue;
            }
            match serde_json::from_value::<Recipe>(input.clone()) {
                Ok(recipe) => return Some(recipe),
                Err(e) => {
                    warn!("tool payload did not match the recipe shape: {e}");
                    return None;
                }
            }
        }
    }
    None
}

/// Issue one extraction call for `image` and extract the result.
///
/// Remote failures propagate unmodified; a missing or malformed tool
/// invocation is the soft path (`recipe: None`).
pub async fn extract_recipe(
    provider: &Arc<dyn VisionProvider>,
    image: EncodedImage,
    config: &ExtractionConfig,
) -> Result<RequestOutcome, LlmError> {
    let request = build_request(image, config);
    let response = provider.request_extraction(&request).await?;

    Ok(RequestOutcome {
        recipe: find_recipe(&response.content),
        usage: response.usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool_use(name: &str, input: serde_json::Value) -> ContentBlock {
        ContentBlock::ToolUse {
            id: "toolu_01".into(),
            name: name.into(),
            input,
        }
    }

    fn valid_input() -> serde_json::Value {
        json!({"title": "Soup", "cook_time": 30, "prep_time": 10, "serves": 4})
    }

    #[test]
    fn finds_matching_tool_use() {
        let content = vec![
            ContentBlock::Text { text: "Here you go.".into() },
            tool_use(RECIPE_TOOL_NAME, valid_input()),
        ];
        let recipe = find_recipe(&content).expect("should find the recipe");
        assert_eq!(recipe.title, "Soup");
    }

    #[test]
    fn ignores_tool_use_with_other_name() {
        let content = vec![tool_use("some_other_tool", valid_input())];
        assert!(find_recipe(&content).is_none());
    }

    #[test]
    fn text_only_response_yields_none() {
        let content = vec![ContentBlock::Text { text: "I cannot see a recipe.".into() }];
        assert!(find_recipe(&content).is_none());
    }

    #[test]
    fn malformed_payload_is_a_soft_skip() {
        let content = vec![tool_use(RECIPE_TOOL_NAME, json!({"title": "No times"}))];
        assert!(find_recipe(&content).is_none());
    }

    #[test]
    fn request_uses_default_persona_and_instruction() {
        let config = ExtractionConfig::default();
        let request = build_request(EncodedImage::jpeg("QUJD"), &config);
        assert_eq!(request.system, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(request.instruction, TOOL_INSTRUCTION);
        assert_eq!(request.max_tokens, 2000);
        assert_eq!(request.tool.name, RECIPE_TOOL_NAME);
    }

    #[test]
    fn request_honors_persona_override() {
        let config = ExtractionConfig::builder()
            .system_prompt("You are terse.")
            .build()
            .unwrap();
        let request = build_request(EncodedImage::jpeg("QUJD"), &config);
        assert_eq!(request.system, "You are terse.");
    }
}
