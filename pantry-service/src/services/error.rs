use crate::services::generator::GeneratorError;
use crate::services::stores::StoreError;
use service_core::error::AppError;
use thiserror::Error;

/// Failures of the item and recipe services, one variant per caller-visible
/// outcome.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    DuplicateItem(String),

    #[error("{0}")]
    GenerationTransport(String),

    #[error("{0}")]
    GenerationSchema(String),

    #[error("{0}")]
    Persistence(String),
}

impl ServiceError {
    /// Stable label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::InvalidInput(_) => "invalid_input",
            ServiceError::DuplicateItem(_) => "duplicate_item",
            ServiceError::GenerationTransport(_) => "transport_error",
            ServiceError::GenerationSchema(_) => "schema_error",
            ServiceError::Persistence(_) => "persistence_error",
        }
    }
}

impl From<GeneratorError> for ServiceError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::InvalidInput => ServiceError::InvalidInput(err.to_string()),
            GeneratorError::Transport(_) => ServiceError::GenerationTransport(err.to_string()),
            GeneratorError::Schema(_) => ServiceError::GenerationSchema(err.to_string()),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        ServiceError::Persistence(err.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            ServiceError::DuplicateItem(msg) => AppError::Conflict(anyhow::anyhow!(msg)),
            ServiceError::GenerationTransport(msg) => AppError::BadGateway(msg),
            ServiceError::GenerationSchema(msg) => AppError::InternalError(anyhow::anyhow!(msg)),
            ServiceError::Persistence(msg) => AppError::DatabaseError(anyhow::anyhow!(msg)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::ProviderError;
    use axum::http::StatusCode;

    fn status_of(err: ServiceError) -> StatusCode {
        AppError::from(err).status_code()
    }

    #[test]
    fn each_kind_maps_to_its_status() {
        assert_eq!(
            status_of(ServiceError::InvalidInput("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ServiceError::DuplicateItem("x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ServiceError::GenerationTransport("x".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(ServiceError::GenerationSchema("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ServiceError::Persistence("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn generator_errors_stay_distinct() {
        let transport: ServiceError = GeneratorError::Transport(ProviderError::RateLimited).into();
        let schema: ServiceError = GeneratorError::Schema("missing field `title`".into()).into();

        assert!(matches!(transport, ServiceError::GenerationTransport(_)));
        assert!(matches!(schema, ServiceError::GenerationSchema(ref m) if m.contains("title")));
    }
}
