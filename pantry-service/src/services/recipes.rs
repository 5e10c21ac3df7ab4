use crate::models::Recipe;
use crate::services::error::ServiceError;
use crate::services::generator::RecipeGenerator;
use crate::services::metrics;
use crate::services::stores::RecipeStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct RecipeService {
    generator: Arc<RecipeGenerator>,
    store: Arc<dyn RecipeStore>,
}

impl RecipeService {
    pub fn new(generator: Arc<RecipeGenerator>, store: Arc<dyn RecipeStore>) -> Self {
        Self { generator, store }
    }

    /// Generate a recipe for `ingredients` and persist it.
    ///
    /// The stored recipe records the requested ingredients verbatim, even when
    /// the model used only a subset.
    pub async fn generate_and_save(&self, ingredients: Vec<String>) -> Result<Recipe, ServiceError> {
        let result = self.generate_and_save_inner(ingredients).await;
        match &result {
            Ok(_) => metrics::record_recipe_generation("success"),
            Err(e) => metrics::record_recipe_generation(e.kind()),
        }
        result
    }

    async fn generate_and_save_inner(&self, ingredients: Vec<String>) -> Result<Recipe, ServiceError> {
        if ingredients.is_empty() {
            return Err(ServiceError::InvalidInput(
                "Items array is required and cannot be empty.".to_string(),
            ));
        }

        tracing::info!(ingredients = %ingredients.join(", "), "Received items for recipe generation");

        let candidate = self.generator.generate(&ingredients).await?;
        if candidate.ingredients != ingredients {
            tracing::debug!(
                used = %candidate.ingredients.join(", "),
                "Model used a different ingredient list than requested"
            );
        }

        let recipe = Recipe::from_candidate(ingredients, candidate);
        self.store.insert_recipe(&recipe).await?;

        tracing::info!(recipe_id = %recipe.id, title = %recipe.title, "Recipe saved");
        Ok(recipe)
    }

    /// Every saved recipe, newest first.
    pub async fn history(&self) -> Result<Vec<Recipe>, ServiceError> {
        Ok(self.store.list_recipes().await?)
    }
}
