use crate::dtos::{GenerateRecipeRequest, GenerateRecipeResponse, RecipeResponse};
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, Json};
use service_core::error::AppError;
use service_core::extract::ValidatedBody;

#[tracing::instrument(skip(state, request))]
pub async fn generate_recipe(
    State(state): State<AppState>,
    ValidatedBody(request): ValidatedBody<GenerateRecipeRequest>,
) -> Result<(StatusCode, Json<GenerateRecipeResponse>), AppError> {
    let recipe = state.recipes.generate_and_save(request.items).await?;

    Ok((
        StatusCode::CREATED,
        Json(GenerateRecipeResponse {
            message: "Recipe generated and saved successfully".to_string(),
            recipe: recipe.into(),
        }),
    ))
}

#[tracing::instrument(skip(state))]
pub async fn recipe_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeResponse>>, AppError> {
    let recipes = state.recipes.history().await?;
    Ok(Json(recipes.into_iter().map(RecipeResponse::from).collect()))
}
