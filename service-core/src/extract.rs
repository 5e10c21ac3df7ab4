use crate::error::AppError;
use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use axum_extra::extract::Form;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Request body accepted as JSON or as `application/x-www-form-urlencoded`,
/// then validated. Repeated form keys (`items=a&items=b`) fill sequences.
pub struct ValidatedBody<T>(pub T);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedBody<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = if is_form(&req) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.to_string())))?;
            value
        } else {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            value
        };

        value.validate()?;
        Ok(ValidatedBody(value))
    }
}
