//! The Recipe Document and the tool schema derived from it.
//!
//! The extraction tool's parameter schema and the [`Recipe`] type describe
//! the same shape. Keeping both in this module — with a drift test at the
//! bottom — ensures a payload the API produces against the schema always
//! deserializes into `Recipe`.

use crate::llm::ToolSpec;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Name of the extraction tool the model is forced to invoke.
pub const RECIPE_TOOL_NAME: &str = "recipe_formatter";

/// Tool description shown to the model.
pub const RECIPE_TOOL_DESCRIPTION: &str =
    "Reads a recipe document and formats it for display in a recipe reader application";

/// A structured recipe extracted from a photographed recipe card.
///
/// Immutable once produced: it is printed and serialized verbatim to disk
/// as `<title>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// The recipe title. Also names the output file.
    pub title: String,
    /// Cooking time in minutes.
    pub cook_time: u32,
    /// Preparation time in minutes.
    pub prep_time: u32,
    /// How many servings the recipe makes.
    pub serves: u32,
    /// Ordered ingredient list; may be empty.
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Ordered method steps; may be empty.
    #[serde(default)]
    pub method_steps: Vec<MethodStep>,
}

/// A single entry in the ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    /// Whether this is a main ingredient of the recipe.
    #[serde(default)]
    pub is_main: bool,
    pub quantity: String,
    pub units: String,
}

/// A single step in the recipe method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodStep {
    pub step_text: String,
}

/// Build the `recipe_formatter` tool definition sent with every request.
///
/// The JSON Schema mirrors [`Recipe`] field for field; see the drift test
/// below before changing either side.
pub fn recipe_tool() -> ToolSpec {
    ToolSpec {
        name: RECIPE_TOOL_NAME.to_string(),
        description: RECIPE_TOOL_DESCRIPTION.to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "title": {"type": "string", "description": "The recipe title"},
                "cook_time": {
                    "type": "integer",
                    "description": "How long it takes to cook the recipe, in minutes",
                },
                "prep_time": {
                    "type": "integer",
                    "description": "How long it takes to prepare the recipe, in minutes",
                },
                "serves": {
                    "type": "integer",
                    "description": "How many servings the recipe makes",
                },
                "ingredients": {
                    "type": "array",
                    "description": "The ingredient list for the recipe",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {
                                "type": "string",
                                "description": "The ingredient name",
                            },
                            "is_main": {
                                "type": "boolean",
                                "description": "Denotes whether this is a main ingredient of the recipe",
                            },
                            "quantity": {
                                "type": "string",
                                "description": "The quantity of this ingredient specified by the recipe",
                            },
                            "units": {
                                "type": "string",
                                "description": "The units used for the quantity of this ingredient",
                            },
                        },
                    },
                },
                "method_steps": {
                    "type": "array",
                    "description": "The steps required to prepare and cook the recipe",
                    "items": {
                        "type": "object",
                        "properties": {
                            "step_text": {
                                "type": "string",
                                "description": "The text describing this step in the recipe method",
                            },
                        },
                    },
                },
            },
            "required": ["title", "cook_time", "prep_time", "serves"],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> serde_json::Value {
        json!({
            "title": "Lemon Drizzle Cake",
            "cook_time": 45,
            "prep_time": 20,
            "serves": 8,
            "ingredients": [
                {"name": "lemon", "is_main": true, "quantity": "2", "units": "whole"},
                {"name": "caster sugar", "is_main": false, "quantity": "225", "units": "g"}
            ],
            "method_steps": [
                {"step_text": "Preheat the oven to 180C."},
                {"step_text": "Cream the butter and sugar."}
            ]
        })
    }

    #[test]
    fn payload_matching_schema_deserializes() {
        let recipe: Recipe = serde_json::from_value(sample_payload()).expect("payload must parse");
        assert_eq!(recipe.title, "Lemon Drizzle Cake");
        assert_eq!(recipe.cook_time, 45);
        assert_eq!(recipe.ingredients.len(), 2);
        assert!(recipe.ingredients[0].is_main);
        assert_eq!(recipe.method_steps[1].step_text, "Cream the butter and sugar.");
    }

    #[test]
    fn lists_default_to_empty() {
        let recipe: Recipe = serde_json::from_value(json!({
            "title": "Toast",
            "cook_time": 3,
            "prep_time": 1,
            "serves": 1
        }))
        .expect("mandatory-only payload must parse");
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.method_steps.is_empty());
    }

    #[test]
    fn missing_mandatory_field_is_rejected() {
        let result: Result<Recipe, _> = serde_json::from_value(json!({
            "title": "Incomplete",
            "cook_time": 10,
            "prep_time": 5
        }));
        assert!(result.is_err(), "serves is mandatory");
    }

    /// Drift guard: every property the schema declares exists on the type,
    /// and the schema's required list matches the non-defaulted fields.
    #[test]
    fn schema_matches_recipe_type() {
        let tool = recipe_tool();
        assert_eq!(tool.name, RECIPE_TOOL_NAME);

        let schema = &tool.input_schema;
        let properties = schema["properties"].as_object().expect("object schema");
        let expected = ["title", "cook_time", "prep_time", "serves", "ingredients", "method_steps"];
        for field in expected {
            assert!(properties.contains_key(field), "schema missing '{field}'");
        }
        assert_eq!(properties.len(), expected.len());

        let required: Vec<&str> = schema["required"]
            .as_array()
            .expect("required list")
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(required, ["title", "cook_time", "prep_time", "serves"]);

        let ingredient_props = schema["properties"]["ingredients"]["items"]["properties"]
            .as_object()
            .expect("ingredient item schema");
        for field in ["name", "is_main", "quantity", "units"] {
            assert!(ingredient_props.contains_key(field), "ingredient schema missing '{field}'");
        }
    }

    #[test]
    fn recipe_round_trips_through_json() {
        let recipe: Recipe = serde_json::from_value(sample_payload()).unwrap();
        let text = serde_json::to_string(&recipe).unwrap();
        let back: Recipe = serde_json::from_str(&text).unwrap();
        assert_eq!(back, recipe);
    }
}
