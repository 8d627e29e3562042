//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::DomainError;

/// Message returned for every 500; the detail only goes to the log
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error body: `{ "error": "<message>" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: message.into(),
            },
        }
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Internal server error; `detail` is logged, never returned
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!("Internal error: {}", detail);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }

    /// Service unavailable
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn message(&self) -> &str {
        &self.response.error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput { message } => Self::bad_request(message),
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Conflict { .. } | DomainError::StorageUnavailable { .. } => {
                Self::internal(err)
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.response.error)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("Name is required");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Name is required");
    }

    #[test]
    fn test_domain_error_conversion() {
        let cases = [
            (DomainError::invalid_input("Name is required"), StatusCode::BAD_REQUEST),
            (DomainError::not_found("API key not found"), StatusCode::NOT_FOUND),
            (
                DomainError::storage_unavailable("connection refused"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DomainError::conflict("secret collision"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (domain_err, status) in cases {
            let api_err: ApiError = domain_err.into();
            assert_eq!(api_err.status, status);
        }
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let api_err: ApiError = DomainError::storage_unavailable("password=hunter2").into();

        assert_eq!(api_err.message(), INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::not_found("API key not found");
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json, serde_json::json!({ "error": "API key not found" }));
    }
}
