use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Error returned by product handlers.
///
/// Every variant renders as `{"error": "<message>"}` so clients see one shape.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Item not found")]
    NotFound,
    #[error("invalid request body: {0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(_) => ApiError::NotFound,
            ServiceError::Storage(_) | ServiceError::Corrupt(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.to_string();
        match status {
            StatusCode::INTERNAL_SERVER_ERROR => error!(error = %msg, "request failed"),
            StatusCode::BAD_REQUEST => warn!(error = %msg, "rejected request body"),
            _ => {}
        }
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status() {
        assert_eq!(ApiError::from(ServiceError::not_found("product")).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(ServiceError::Corrupt("x".into())).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::from(ServiceError::Storage("x".into())).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_message_is_stable() {
        assert_eq!(ApiError::NotFound.to_string(), "Item not found");
    }
}
