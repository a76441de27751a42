//! Prompt text for the extraction request.
//!
//! Centralising the persona and instruction here keeps them in one place
//! and lets unit tests inspect them without a live API call. Callers can
//! override the persona via
//! [`crate::config::ExtractionConfig::system_prompt`]; the constants here
//! are used only when no override is provided.

/// Default system-level persona framing for every extraction request.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a recipe assistant, in charge of keeping a \
home cook's recipes and meal plans organized and accurate.";

/// Fixed user instruction accompanying the image. The forced tool choice
/// does the real constraining; this line just points the model at the tool.
pub const TOOL_INSTRUCTION: &str = "use the recipe_formatter tool";
