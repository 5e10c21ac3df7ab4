pub mod items;
pub mod recipes;

pub use items::{AddItemRequest, AddItemResponse, ItemResponse};
pub use recipes::{GenerateRecipeRequest, GenerateRecipeResponse, RecipeResponse};
