use crate::models::Recipe;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRecipeRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Items array is required and cannot be empty."))]
    pub items: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    pub id: String,
    pub ingredients: Vec<String>,
    pub title: String,
    pub instructions: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            ingredients: recipe.ingredients,
            title: recipe.title,
            instructions: recipe.instructions,
            created_at: recipe.created_at.to_rfc3339(),
            updated_at: recipe.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRecipeResponse {
    pub message: String,
    pub recipe: RecipeResponse,
}
