use crate::dtos::{AddItemRequest, AddItemResponse, ItemResponse};
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, Json};
use service_core::error::AppError;
use service_core::extract::ValidatedBody;

#[tracing::instrument(skip(state, request))]
pub async fn add_item(
    State(state): State<AppState>,
    ValidatedBody(request): ValidatedBody<AddItemRequest>,
) -> Result<(StatusCode, Json<AddItemResponse>), AppError> {
    let name = request.item.unwrap_or_default();
    let item = state.items.add(&name).await?;

    Ok((
        StatusCode::CREATED,
        Json(AddItemResponse {
            message: "Item added successfully".to_string(),
            item: item.into(),
        }),
    ))
}

#[tracing::instrument(skip(state))]
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<ItemResponse>>, AppError> {
    let items = state.items.list().await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}
