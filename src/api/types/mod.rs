//! Request and response types for the HTTP API

pub mod api_key;
pub mod error;
pub mod json;

pub use api_key::{
    ApiKeyResponse, CreateApiKeyRequest, DeleteApiKeyQuery, DeleteApiKeyResponse,
    UpdateApiKeyRequest, ValidateKeyRequest, ValidateKeyResponse,
};
pub use error::{ApiError, ApiErrorResponse, INTERNAL_ERROR_MESSAGE};
pub use json::{Json, INVALID_BODY_MESSAGE};
