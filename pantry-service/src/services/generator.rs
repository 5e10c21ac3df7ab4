//! Recipe generation through the configured [`TextProvider`].
//!
//! The model is asked for a JSON object with exactly `ingredients`, `title`
//! and `instructions`; whatever comes back is treated as untrusted and
//! checked against [`RecipeCandidate`] before any field is used.

use crate::models::RecipeCandidate;
use crate::services::metrics;
use crate::services::providers::{GenerationParams, ProviderError, TextProvider};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use validator::Validate;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Ingredients must be provided as a non-empty array.")]
    InvalidInput,

    /// The model could not be reached or refused the request.
    #[error("Recipe generation failed: {0}")]
    Transport(#[from] ProviderError),

    /// The model answered, but not with a usable recipe.
    #[error("Recipe generation failed: Output did not match the required schema. Details: {0}")]
    Schema(String),
}

pub struct RecipeGenerator {
    provider: Arc<dyn TextProvider>,
    temperature: f32,
}

impl RecipeGenerator {
    pub fn new(provider: Arc<dyn TextProvider>, temperature: f32) -> Self {
        Self {
            provider,
            temperature,
        }
    }

    pub fn build_prompt(ingredients: &[String]) -> String {
        format!(
            "Create a recipe using ONLY the following ingredients: {}. \
             Include a title, the list of ingredients used (must be from the provided list or a subset), \
             and step-by-step instructions. Strictly follow the output format defined by the schema \
             and do not include any additional explanatory text or markdown formatting. \
             If the ingredients are insufficient for a standard recipe, be creative but only use the provided items.",
            ingredients.join(", ")
        )
    }

    /// Response schema in the model API's OpenAPI subset.
    pub fn output_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "ingredients": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "List of ingredients used in the recipe."
                },
                "title": {
                    "type": "STRING",
                    "description": "The title or name of the generated recipe."
                },
                "instructions": {
                    "type": "STRING",
                    "description": "Step-by-step instructions for preparing the recipe."
                }
            },
            "required": ["ingredients", "title", "instructions"],
            "propertyOrdering": ["ingredients", "title", "instructions"]
        })
    }

    fn params(&self) -> GenerationParams {
        GenerationParams {
            temperature: Some(self.temperature),
            output_schema: Some(Self::output_schema()),
        }
    }

    /// One round trip to the model; no retries.
    pub async fn generate(&self, ingredients: &[String]) -> Result<RecipeCandidate, GeneratorError> {
        if ingredients.is_empty() {
            return Err(GeneratorError::InvalidInput);
        }

        let prompt = Self::build_prompt(ingredients);
        let provider_name = self.provider.name().to_string();
        let model = self.provider.model().to_string();

        tracing::info!(
            provider = %provider_name,
            model = %model,
            ingredient_count = ingredients.len(),
            "Generating recipe"
        );

        let start = Instant::now();
        let result = self.provider.generate(&prompt, &self.params()).await;
        metrics::record_provider_latency(&provider_name, &model, start.elapsed().as_secs_f64());

        let response = result.map_err(|e| {
            tracing::error!(provider = %provider_name, error = %e, "Recipe generation request failed");
            metrics::record_provider_error(&provider_name, e.kind());
            GeneratorError::Transport(e)
        })?;

        metrics::record_tokens(&model, response.input_tokens, response.output_tokens);

        let text = response
            .text
            .ok_or_else(|| GeneratorError::Schema("Recipe generation returned no output.".into()))?;

        let candidate = parse_candidate(&text).map_err(|e| {
            tracing::warn!(error = %e, "Model output failed recipe schema validation");
            e
        })?;

        tracing::debug!(title = %candidate.title, "Generated recipe candidate");
        Ok(candidate)
    }
}

/// Parse and validate raw model output.
pub fn parse_candidate(text: &str) -> Result<RecipeCandidate, GeneratorError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(GeneratorError::Schema(
            "Recipe generation returned no output.".to_string(),
        ));
    }

    let candidate: RecipeCandidate =
        serde_json::from_str(text).map_err(|e| GeneratorError::Schema(e.to_string()))?;

    candidate
        .validate()
        .map_err(|e| GeneratorError::Schema(e.to_string()))?;

    Ok(candidate.trimmed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::{MockReply, MockTextProvider};

    fn ingredients(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn generator_with(replies: Vec<MockReply>) -> (RecipeGenerator, Arc<MockTextProvider>) {
        let provider = Arc::new(MockTextProvider::with_replies(replies));
        (RecipeGenerator::new(provider.clone(), 0.0), provider)
    }

    #[test]
    fn prompt_lists_ingredients_in_order() {
        let prompt = RecipeGenerator::build_prompt(&ingredients(&["Rice", "Egg", "Milk"]));
        assert!(prompt.contains("ONLY the following ingredients: Rice, Egg, Milk."));
    }

    #[test]
    fn schema_requires_all_three_fields() {
        let schema = RecipeGenerator::output_schema();
        assert_eq!(
            schema["required"],
            json!(["ingredients", "title", "instructions"])
        );
        assert_eq!(schema["properties"]["instructions"]["type"], "STRING");
    }

    #[test]
    fn parse_candidate_trims_text_fields() {
        let candidate = parse_candidate(
            r#"{"ingredients":["Egg"],"title":"  Fried Egg ","instructions":" Fry it. "}"#,
        )
        .unwrap();
        assert_eq!(candidate.title, "Fried Egg");
        assert_eq!(candidate.instructions, "Fry it.");
    }

    #[test]
    fn parse_candidate_ignores_extra_fields() {
        let candidate = parse_candidate(
            r#"{"ingredients":["Egg"],"title":"T","instructions":"I","servings":2}"#,
        )
        .unwrap();
        assert_eq!(candidate.ingredients, vec!["Egg"]);
    }

    #[test]
    fn parse_candidate_rejects_bad_shapes() {
        let cases = [
            r#"{"ingredients":["Egg"],"instructions":"Fry."}"#,
            r#"{"ingredients":[],"title":"T","instructions":"Fry."}"#,
            r#"{"ingredients":[1,2],"title":"T","instructions":"Fry."}"#,
            r#"{"ingredients":["Egg"],"title":"","instructions":"Fry."}"#,
            r#"{"ingredients":["Egg"],"title":"T","instructions":["Fry."]}"#,
            "Here is your recipe!",
            "   ",
        ];
        for case in cases {
            assert!(
                matches!(parse_candidate(case), Err(GeneratorError::Schema(_))),
                "expected schema error for {case}"
            );
        }
    }

    #[tokio::test]
    async fn empty_ingredients_skip_the_provider() {
        let (generator, provider) = generator_with(vec![]);
        let err = generator.generate(&[]).await.unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidInput));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn sends_schema_at_zero_temperature() {
        let (generator, provider) = generator_with(vec![]);
        generator.generate(&ingredients(&["Egg", "Milk"])).await.unwrap();

        let (prompt, params) = provider.last_request().unwrap();
        assert!(prompt.contains("Egg, Milk"));
        assert_eq!(params.temperature, Some(0.0));
        assert_eq!(params.output_schema, Some(RecipeGenerator::output_schema()));
    }

    #[tokio::test]
    async fn provider_failure_is_transport_error() {
        let (generator, _) =
            generator_with(vec![MockReply::Error(ProviderError::NetworkError("reset".into()))]);
        let err = generator.generate(&ingredients(&["Egg"])).await.unwrap_err();
        assert!(matches!(err, GeneratorError::Transport(_)));
    }

    #[tokio::test]
    async fn empty_output_is_schema_error() {
        let (generator, _) = generator_with(vec![MockReply::Empty]);
        let err = generator.generate(&ingredients(&["Egg"])).await.unwrap_err();
        assert!(matches!(err, GeneratorError::Schema(_)));
    }
}
